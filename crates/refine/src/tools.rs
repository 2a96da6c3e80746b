pub mod dispatcher;
pub mod price;
pub mod schema;

pub use dispatcher::ToolDispatcher;
pub use price::{price_between, price_greater_than, price_less_than, price_tool_set};
pub use schema::validate_schema;
