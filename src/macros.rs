/// Compile a regex literal once and hand out a `&'static Regex`.
///
/// The pattern is a literal, so a failing compile is a programming error that
/// surfaces on first use.
#[macro_export]
macro_rules! regex {
    ($pat:literal) => {{
        static RE: once_cell::sync::Lazy<regex::Regex> =
            once_cell::sync::Lazy::new(|| regex::Regex::new($pat).expect("invalid regex literal"));
        &*RE
    }};
}
