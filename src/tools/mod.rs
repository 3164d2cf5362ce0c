//! 工具层：Tool trait、注册表与目录检索工具

pub mod lookup;
pub mod registry;

pub use lookup::{LookupArgs, LookupTool};
pub use registry::{Tool, ToolError, ToolRegistry};
