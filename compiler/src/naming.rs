//! Symbol names derived from package and type names.
//!
//! Every name a back end emits for a message type goes through here so that
//! cross-type references, include paths and module paths agree.

/// Converts a mixed-case identifier to lowercase words separated by
/// underscores.
///
/// An underscore goes before an uppercase letter that follows a lowercase
/// letter or digit, and before the last letter of an uppercase run when a
/// lowercase letter follows it, so acronyms stay together:
/// `NavSatStatus` → `nav_sat_status`, `MultiDOFJointState` →
/// `multi_dof_joint_state`, `UInt32MultiArray` → `u_int32_multi_array`.
/// Already normalized input is returned unchanged.
pub fn uncamelcase(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut lower = String::with_capacity(s.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() {
            if i > 0 {
                let prev = chars[i - 1];
                let next_lower = chars.get(i + 1).map_or(false, |n| n.is_lowercase());
                if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_lower) {
                    lower.push('_');
                }
            }
            lower.extend(c.to_lowercase());
        } else {
            lower.push(c);
        }
    }
    lower
}

/// Canonical symbol of a message type, `<pkg>__<normalized_name>`.
pub fn struct_symbol(namespace: &str, type_name: &str) -> String {
    format!("{}__{}", namespace, uncamelcase(type_name)).to_lowercase()
}

/// Name the transport uses to match publishers and subscribers.
pub fn wire_type_name(namespace: &str, type_name: &str) -> String {
    format!("{}::msg::dds_::{}_", namespace, type_name)
}

/// Name of the partial encoder that stops right before `field`.
pub fn partial_encoder_name(field: &str) -> String {
    format!("encode_until_{}", field)
}

/// Escapes Rust reserved keywords by suffixing with an underscore.
pub fn escape_rust_keyword(s: &str) -> String {
    let keywords = [
        "as", "async", "await", "break", "const", "continue", "crate", "dyn",
        "else", "enum", "extern", "false", "fn", "for", "if", "impl", "in",
        "let", "loop", "match", "mod", "move", "mut", "pub", "ref", "return",
        "self", "Self", "static", "struct", "super", "trait", "true", "type",
        "unsafe", "use", "where", "while",
    ];
    if keywords.contains(&s) {
        format!("{}_", s)
    } else {
        s.to_string()
    }
}
