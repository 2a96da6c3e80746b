pub mod catalog;
pub mod config;
pub mod context;
pub mod error;
pub mod filter;
pub mod intent;
pub mod reconcile;
pub mod session;
pub mod tools;

pub use crate::catalog::CatalogItem;
pub use crate::config::{FilterConfig, NumericBase};
pub use crate::context::{ContextBuilder, ContextInput};
pub use crate::error::{FilterError, Result};
pub use crate::filter::{CatalogFilter, FilterRequest, FilterResponse};
pub use crate::intent::{IntentResolver, ModelResult, StructuredFilterResult, ToolInvocation};
pub use crate::reconcile::{Reconciled, ResultReconciler};
pub use crate::session::{
    FileSessionStore, MemorySessionStore, SessionState, SessionStore, SharedSessionStore,
};
pub use crate::tools::ToolDispatcher;
