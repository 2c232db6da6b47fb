//! Data Transfer Objects (DTOs)
//!
//! Request payloads validate themselves into domain commands; response
//! DTOs shape domain records into the camelCase JSON the API returns.

mod order_dto;
mod product_dto;
mod query_dto;
mod user_dto;
mod validation;

pub use order_dto::{
    CreateOrderDto, OrderDto, OrderItemDto, OrderItemRequestDto, UpdateOrderStatusDto,
};
pub use product_dto::{CreateProductDto, ProductDto, UpdateProductDto};
pub use query_dto::{ListQueryDto, ListWindow};
pub use user_dto::{
    CreateUserDto, SaveProductDto, SavedItemsDto, UpdateUserDto, UserDto, UserPreferenceDto,
};
