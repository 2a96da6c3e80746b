pub mod resolver;
pub mod result;

pub use resolver::{product_list_schema, IntentResolver, PRODUCT_LIST_FORMAT};
pub use result::{ModelResult, StructuredFilterResult, ToolInvocation};
