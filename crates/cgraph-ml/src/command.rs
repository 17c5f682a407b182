//! Command string assembly

use crate::options::CommandOptions;

/// Append one fragment per option to `base`, in option order
pub fn render(base: &str, options: &CommandOptions) -> String {
    let mut cmd = base.to_string();
    for (name, value) in options.iter() {
        cmd.push_str(&value.fragment(name));
    }
    cmd
}

/// Composite "read + structural check" command for a file
pub fn load_command(path: &str, read_command: &str, check_command: &str) -> String {
    format!("{read_command} {path}; {check_command}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{CommandOptions, KeywordValue, OptionPolicy};

    #[test]
    fn test_render_keyword_options() {
        let keywords = [
            ("O", KeywordValue::from(5)),
            ("c", KeywordValue::from(true)),
            ("K", KeywordValue::from(-1)),
        ];
        let options = CommandOptions::from_keywords(&keywords, OptionPolicy::Skip).unwrap();
        assert_eq!(render("x", &options), "x -O 5 -c");

        let options =
            CommandOptions::from_keywords(&[("c", KeywordValue::from(false))], OptionPolicy::Skip)
                .unwrap();
        assert_eq!(render("x", &options), "x");
    }

    #[test]
    fn test_render_typed_options() {
        let options = CommandOptions::new()
            .value("K", 6)
            .absent("C")
            .flag("l", true)
            .flag("v", false);
        assert_eq!(render("if", &options), "if -K 6 -l");
        assert_eq!(render("st", &CommandOptions::new()), "st");
    }

    #[test]
    fn test_load_command() {
        assert_eq!(
            load_command("design.blif", "read", "st"),
            "read design.blif; st"
        );
        assert_eq!(load_command("a.aig", "r", "strash"), "r a.aig; strash");
    }
}
