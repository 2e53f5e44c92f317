//! Identifier transformations shared by the resolver and the synthesiser.

/// Upper-case the first character, leaving the rest untouched.
///
/// Constructor parameters such as `firstName` map onto properties such as
/// `FirstName`; acronyms (`url` → `Url`, `URL` → `URL`) keep their tail.
#[must_use]
pub fn pascal_case(name: &str) -> String {
    let mut chars = name.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// Lower-case the first character, leaving the rest untouched.
#[must_use]
pub fn camel_case(name: &str) -> String {
    let mut chars = name.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_lowercase().chain(chars).collect()
    })
}

/// Private backing-field name for a member: `_` + camel case.
#[must_use]
pub fn field_name(name: &str) -> String {
    format!("_{}", camel_case(&pascal_case(name)))
}

/// Reserved words that need an `@` prefix when used as identifiers.
const KEYWORDS: [&str; 77] = [
    "abstract", "as", "base", "bool", "break", "byte", "case", "catch", "char", "checked",
    "class", "const", "continue", "decimal", "default", "delegate", "do", "double", "else",
    "enum", "event", "explicit", "extern", "false", "finally", "fixed", "float", "for",
    "foreach", "goto", "if", "implicit", "in", "int", "interface", "internal", "is", "lock",
    "long", "namespace", "new", "null", "object", "operator", "out", "override", "params",
    "private", "protected", "public", "readonly", "ref", "return", "sbyte", "sealed", "short",
    "sizeof", "stackalloc", "static", "string", "struct", "switch", "this", "throw", "true",
    "try", "typeof", "uint", "ulong", "unchecked", "unsafe", "ushort", "using", "virtual",
    "void", "volatile", "while",
];

/// Prefix reserved words with `@` so they can name parameters.
#[must_use]
pub fn escape_identifier(name: &str) -> String {
    if KEYWORDS.contains(&name) {
        format!("@{name}")
    } else {
        name.to_owned()
    }
}

/// Split a comma-separated option into trimmed, non-empty items.
pub fn split_list(value: &str) -> impl Iterator<Item = &str> {
    value.split(',').map(str::trim).filter(|item| !item.is_empty())
}

/// Expand a `string.Format`-style option.
///
/// `{N}` is replaced by `args[N]`, `{{` and `}}` collapse to single braces.
/// Arguments are inserted verbatim and never rescanned. A placeholder with
/// no matching argument, or an unterminated `{`, is copied unchanged.
#[must_use]
pub fn apply_format(format: &str, args: &[&str]) -> String {
    let mut out = String::with_capacity(format.len());
    let mut chars = format.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '{' | '}' if chars.peek() == Some(&ch) => {
                chars.next();
                out.push(ch);
            }
            '{' => {
                let mut ahead = chars.clone();
                let mut digits = String::new();
                let mut closed = false;
                for next in ahead.by_ref() {
                    if next == '}' {
                        closed = true;
                        break;
                    }
                    digits.push(next);
                }
                let argument = digits
                    .parse::<usize>()
                    .ok()
                    .filter(|_| closed)
                    .and_then(|position| args.get(position).copied());
                out.push_str(argument.unwrap_or("{"));
                if argument.is_some() {
                    chars = ahead;
                }
            }
            _ => out.push(ch),
        }
    }
    out
}
