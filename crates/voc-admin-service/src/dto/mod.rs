//! 管理后台 DTO 模块
//!
//! 包含所有请求和响应的数据传输对象

pub mod request;
pub mod response;

// 重新导出常用类型
pub use request::{
    AddCustomOptionRequest, AddUserRoleRequest, LevelUpUpdateRequest, MissionUpdateRequest,
    SetStepRequest, TierRowUpdateRequest, UpdatePromoFieldsRequest, VipMultiplierRequest,
};

pub use response::{
    AccountDto, AdminUserDto, ApiResponse, ApiDataDto, BrandProfileDto, ChatMessageDto,
    ChatSessionDto, CommunicationStyleDto, PlayerBehaviourDto, PromoSessionDto, SafetyCrisisDto,
    SupportEscalationDto, UserRoleDto, VocConfigDto,
};
