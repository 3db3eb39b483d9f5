use crate::parser::Typed;

/// Helper for rendering type unions as field text
pub struct TypeRenderer;

impl TypeRenderer {
    /// A bare `|` would start a substitution reference.
    pub const UNION_SEPARATOR: &'static str = "\\|";

    pub fn escape(name: &str) -> String {
        name.replace('\\', "\\\\")
    }

    /// `Array\|null`, without cross-references.
    pub fn union(names: &[String]) -> String {
        names
            .iter()
            .map(|name| Self::escape(name))
            .collect::<Vec<_>>()
            .join(Self::UNION_SEPARATOR)
    }

    pub fn render_types(typed: &impl Typed) -> String {
        Self::union(typed.type_names())
    }
}

/// Helper for field lines
pub struct FieldRenderer;

impl FieldRenderer {
    /// `:tag arg1 arg2: body`, dropping empty arguments.
    pub fn field(tag: &str, args: &[&str], body: &str) -> String {
        let mut head = String::from(tag);
        for arg in args.iter().filter(|a| !a.is_empty()) {
            head.push(' ');
            head.push_str(arg);
        }
        if body.is_empty() {
            format!(":{head}:")
        } else {
            format!(":{head}: {body}")
        }
    }
}
