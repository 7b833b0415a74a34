//! MCP tool parameter structs, one per tool handler, deserialized from JSON-RPC calls.

use schemars::JsonSchema;
use serde::Deserialize;

/// Parameters for the `list_methods` tool.
#[derive(Debug, Deserialize, JsonSchema)]
pub(crate) struct ListMethodsParams {
    /// Global class name (e.g., 'ZCL_SALES_ORDER_API')
    pub(crate) class_name: String,
}

/// Parameters for the `get_method_code` tool.
#[derive(Debug, Deserialize, JsonSchema)]
pub(crate) struct MethodCodeParams {
    /// Global class name
    pub(crate) class_name: String,
    /// Method name as listed by list_methods; the short name of an interface method (e.g., 'read' for 'zif_reader~read') also works
    pub(crate) method_name: String,
}

/// Parameters for the `get_class_definition` tool.
#[derive(Debug, Deserialize, JsonSchema)]
pub(crate) struct ClassDefinitionParams {
    /// Global class name
    pub(crate) class_name: String,
    /// Only sections, interfaces, events and method signatures; drops TYPES/DATA/CONSTANTS (default: false)
    pub(crate) outline: Option<bool>,
}

/// Parameters for the `get_interface_definition` tool.
#[derive(Debug, Deserialize, JsonSchema)]
pub(crate) struct InterfaceDefinitionParams {
    /// Global interface name (e.g., 'ZIF_ORDER_READER')
    pub(crate) interface_name: String,
    /// Only method and event signatures (default: false)
    pub(crate) outline: Option<bool>,
}

/// Parameters for the `get_source_code` tool.
#[derive(Debug, Deserialize, JsonSchema)]
pub(crate) struct SourceCodeParams {
    /// Object name (class, interface, table, program or CDS view)
    pub(crate) object_name: String,
    /// Object type: 'class', 'interface', 'table', 'program', 'view' or the abapGit code ('clas', 'intf', 'tabl', 'prog', 'ddls')
    pub(crate) object_type: String,
    /// Remove blocks of 3+ consecutive comment lines (default: true)
    pub(crate) strip_comments: Option<bool>,
    /// Truncate the text to this many lines
    pub(crate) max_lines: Option<usize>,
}

/// Parameters for the `get_dependencies` tool.
#[derive(Debug, Deserialize, JsonSchema)]
pub(crate) struct DependenciesParams {
    /// Global class name
    pub(crate) class_name: String,
    /// Restrict the report to one method (default: all methods)
    pub(crate) method_name: Option<String>,
}

/// Parameters for the `get_table_fields` tool.
#[derive(Debug, Deserialize, JsonSchema)]
pub(crate) struct TableFieldsParams {
    /// Global class name
    pub(crate) class_name: String,
    /// Method whose SELECT statements are analyzed
    pub(crate) method_name: String,
}
