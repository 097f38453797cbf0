//! Placeholder expansion for command tokens.
//!
//! Three placeholders are recognized: `{{app.name}}`, `{{app.path}}` and
//! `{{HOME}}`. Replacement is literal and happens in a single left-to-right
//! pass, so text inserted by one placeholder is never expanded again.

/// `{{app.name}}` placeholder.
pub const APP_NAME: &str = "{{app.name}}";
/// `{{app.path}}` placeholder.
pub const APP_PATH: &str = "{{app.path}}";
/// `{{HOME}}` placeholder.
pub const HOME: &str = "{{HOME}}";

/// Values substituted into the tokens of one pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Variables<'a> {
    /// Value for `{{app.name}}`.
    pub app_name: &'a str,
    /// Value for `{{app.path}}`.
    pub app_path: &'a str,
    /// Value for `{{HOME}}`.
    pub home: &'a str,
}

impl<'a> Variables<'a> {
    /// Bundle the substitution values.
    #[must_use]
    pub const fn new(app_name: &'a str, app_path: &'a str, home: &'a str) -> Self {
        Self {
            app_name,
            app_path,
            home,
        }
    }

    /// Expand every placeholder in `token`.
    #[must_use]
    pub fn substitute(&self, token: &str) -> String {
        let table = [
            (APP_NAME, self.app_name),
            (APP_PATH, self.app_path),
            (HOME, self.home),
        ];

        let mut out = String::with_capacity(token.len());
        let mut rest = token;
        while let Some(start) = rest.find("{{") {
            let (before, candidate) = rest.split_at(start);
            out.push_str(before);
            if let Some((value, after)) = table
                .iter()
                .find_map(|(p, v)| candidate.strip_prefix(p).map(|after| (*v, after)))
            {
                out.push_str(value);
                rest = after;
            } else {
                out.push_str("{{");
                rest = candidate.strip_prefix("{{").unwrap_or_default();
            }
        }
        out.push_str(rest);
        out
    }

    /// Expand every token of `command`.
    #[must_use]
    pub fn substitute_all(&self, command: &[String]) -> Vec<String> {
        command.iter().map(|token| self.substitute(token)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VARS: Variables<'static> = Variables::new("demo", "/srv/x", "/home/ops");

    #[test]
    fn expands_path_and_name() {
        assert_eq!(VARS.substitute("{{app.path}}/{{app.name}}.log"), "/srv/x/demo.log");
    }

    #[test]
    fn expands_home() {
        assert_eq!(VARS.substitute("{{HOME}}/.docker"), "/home/ops/.docker");
    }

    #[test]
    fn expands_repeated_placeholders() {
        assert_eq!(
            VARS.substitute("{{app.name}}-{{app.name}}-{{app.name}}"),
            "demo-demo-demo"
        );
    }

    #[test]
    fn leaves_tokens_without_placeholders_untouched() {
        assert_eq!(VARS.substitute("--remove-orphans"), "--remove-orphans");
        assert_eq!(VARS.substitute(""), "");
    }

    #[test]
    fn unknown_placeholders_are_kept_literally() {
        assert_eq!(VARS.substitute("{{app.port}}"), "{{app.port}}");
        assert_eq!(VARS.substitute("{{ {{app.name}}"), "{{ demo");
        assert_eq!(VARS.substitute("trailing {{"), "trailing {{");
    }

    #[test]
    fn placeholder_names_are_case_sensitive() {
        assert_eq!(VARS.substitute("{{home}}"), "{{home}}");
    }

    #[test]
    fn inserted_values_are_not_expanded_again() {
        let vars = Variables::new("{{HOME}}", "/srv/x", "/home/ops");
        assert_eq!(vars.substitute("{{app.name}}"), "{{HOME}}");
    }

    #[test]
    fn empty_values_remove_placeholders() {
        let vars = Variables::new("POST-UPDATE", "", "");
        assert_eq!(vars.substitute("{{app.path}}{{HOME}}/x"), "/x");
    }

    #[test]
    fn substitute_all_maps_every_token() {
        let command = vec!["echo".to_string(), "{{app.name}}".to_string(), "{{app.path}}".to_string()];
        assert_eq!(VARS.substitute_all(&command), vec!["echo", "demo", "/srv/x"]);
    }
}
