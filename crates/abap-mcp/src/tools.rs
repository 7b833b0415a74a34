//! MCP tool handlers. All `#[tool]` methods live in the single `#[tool_router]` impl block.

use rmcp::{handler::server::wrapper::Parameters, tool, tool_router};

use crate::helpers::{parse_object_kind, truncate_source};
use crate::params::*;
use crate::server::ScopeServer;

#[tool_router]
impl ScopeServer {
    #[tool(
        description = "List the methods implemented by an ABAP class, in implementation order. Interface methods appear qualified (e.g., 'zif_reader~read'). Call this first to learn valid method names."
    )]
    async fn list_methods(
        &self,
        Parameters(params): Parameters<ListMethodsParams>,
    ) -> Result<String, String> {
        self.run(move |nav| nav.list_methods(&params.class_name))
            .await
    }

    #[tool(
        description = "Get the full source of one method (METHOD ... ENDMETHOD.) with long comment blocks removed. Returns line_count and source_code. A missing method returns a not_found error with close-match suggestions."
    )]
    async fn get_method_code(
        &self,
        Parameters(params): Parameters<MethodCodeParams>,
    ) -> Result<String, String> {
        self.run(move |nav| nav.method_code(&params.class_name, &params.method_name))
            .await
    }

    #[tool(
        description = "Get a class's definition block (CLASS ... DEFINITION through ENDCLASS.). Set outline=true to keep only sections, interfaces, events and method signatures, which is usually enough to write a test double or plan test cases."
    )]
    async fn get_class_definition(
        &self,
        Parameters(params): Parameters<ClassDefinitionParams>,
    ) -> Result<String, String> {
        let outline = params.outline.unwrap_or(false);
        self.run(move |nav| nav.class_definition(&params.class_name, outline))
            .await
    }

    #[tool(
        description = "Get an interface's definition block (INTERFACE ... ENDINTERFACE.). Use it to see the signatures a class implements or to build a test double for a dependency."
    )]
    async fn get_interface_definition(
        &self,
        Parameters(params): Parameters<InterfaceDefinitionParams>,
    ) -> Result<String, String> {
        let outline = params.outline.unwrap_or(false);
        self.run(move |nav| nav.interface_definition(&params.interface_name, outline))
            .await
    }

    #[tool(
        description = "Get the source of any repository object: class, interface, table (abapGit XML), program or CDS view. Comment blocks are stripped unless strip_comments=false."
    )]
    async fn get_source_code(
        &self,
        Parameters(params): Parameters<SourceCodeParams>,
    ) -> Result<String, String> {
        let kind = parse_object_kind(&params.object_type)?;
        let strip = params.strip_comments.unwrap_or(true);
        let max_lines = params.max_lines;
        self.run(move |nav| {
            let mut source = nav.source_code(&params.object_name, kind, strip)?;
            if let Some(max) = max_lines {
                source.text = truncate_source(&source.text, max);
            }
            Ok(source)
        })
        .await
    }

    #[tool(
        description = "Dependency report for a class: implemented interfaces and, per method, code line count, database tables read, function modules called, classes instantiated or called statically, and table->field usage. Use it to decide what a unit test must isolate. Pass method_name to restrict to one method."
    )]
    async fn get_dependencies(
        &self,
        Parameters(params): Parameters<DependenciesParams>,
    ) -> Result<String, String> {
        self.run(move |nav| nav.dependencies(&params.class_name, params.method_name.as_deref()))
            .await
    }

    #[tool(
        description = "Tables and the fields one method selects from each, resolved through table aliases. Fields that cannot be attributed to one table in a join are listed under __UNMAPPED_FIELDS__."
    )]
    async fn get_table_fields(
        &self,
        Parameters(params): Parameters<TableFieldsParams>,
    ) -> Result<String, String> {
        self.run(move |nav| nav.table_fields(&params.class_name, &params.method_name))
            .await
    }
}

impl ScopeServer {
    /// Accessor for the tool router generated by `#[tool_router]`, which is
    /// private to this module while `new()` lives in server.rs.
    pub(crate) fn create_tool_router() -> rmcp::handler::server::router::tool::ToolRouter<Self> {
        Self::tool_router()
    }
}
