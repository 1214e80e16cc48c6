use kuchiki::traits::TendrilSink;
use std::collections::BTreeSet;

/// Count distinct inline `font-family` declarations.
///
/// Declarations are compared as trimmed strings, so `font-family: Arial`
/// and `font-family:Arial` count twice.
pub fn count_font_declarations(markup: &str) -> usize {
    let document = kuchiki::parse_html().one(markup);
    let mut declarations = BTreeSet::new();

    if let Ok(styled) = document.select("[style]") {
        for element in styled {
            let attrs = element.attributes.borrow();
            let Some(style) = attrs.get("style") else {
                continue;
            };
            for declaration in style.split(';') {
                if declaration.contains("font-family") {
                    declarations.insert(declaration.trim().to_string());
                }
            }
        }
    }

    declarations.len()
}
