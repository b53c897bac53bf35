use serde::Serialize;
use tera::{Context, Error as TeraError, Tera};

/// Render an inline prompt template. Context values are inserted verbatim;
/// inline templates are never autoescaped.
pub fn load_prompt<T: Serialize>(template: &str, context_data: &T) -> Result<String, TeraError> {
    let mut tera = Tera::default();
    tera.add_raw_template("inline_template", template)?;
    let context = Context::from_serialize(context_data)?;
    let rendered = tera.render("inline_template", &context)?;
    Ok(rendered)
}
