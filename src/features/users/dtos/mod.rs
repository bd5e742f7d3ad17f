mod user_dto;

pub use user_dto::{
    CreateUserDto, UpdateUserDto, UserListResponse, UserQueryParams, UserResponseDto, UserSortBy,
};
