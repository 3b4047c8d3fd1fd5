//! Module text emitted for a compiled template.

use crate::compiler::CompiledTemplate;

/// Export carrying the component name for manual registration.
pub const COMPONENT_NAME_EXPORT: &str = "__jqhtml_component_name";

/// Appends the component-name export to the compiled code.
///
/// The name is written as a JSON string literal, which is also a valid
/// JavaScript string literal.
pub fn render_module(compiled: &CompiledTemplate) -> String {
    let name = serde_json::Value::from(compiled.component_name.as_str());
    format!(
        "\n{}\n\n// Export component name for manual registration\nexport const {} = {};\n",
        compiled.code, COMPONENT_NAME_EXPORT, name
    )
}
