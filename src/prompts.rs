pub const SYSTEM_INSTRUCTION: &str = include_str!("../data/prompts/system_instruction.txt");
pub const COUNT_INSTRUCTION: &str = include_str!("../data/prompts/count_instruction.txt");
pub const TEXT_BACKGROUND: &str = include_str!("../data/prompts/text_background.txt");
pub const IMAGE_BACKGROUND: &str = include_str!("../data/prompts/image_background.txt");

/// Replace `{{key}}` placeholders in a template string.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        result = result.replace(&format!("{{{{{}}}}}", key), value);
    }
    result
}

/// Instruction naming how many person images precede it.
pub fn count_instruction(person_count: usize) -> String {
    render(COUNT_INSTRUCTION, &[("count", &person_count.to_string())])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_single_var() {
        assert_eq!(
            render("Hello {{name}}!", &[("name", "world")]),
            "Hello world!"
        );
    }

    #[test]
    fn test_render_multiple_vars() {
        assert_eq!(
            render("{{a}} and {{b}}", &[("a", "cats"), ("b", "dogs")]),
            "cats and dogs"
        );
    }

    #[test]
    fn test_prompts_are_non_empty() {
        assert!(!SYSTEM_INSTRUCTION.is_empty());
        assert!(!COUNT_INSTRUCTION.is_empty());
        assert!(!TEXT_BACKGROUND.is_empty());
        assert!(!IMAGE_BACKGROUND.is_empty());
    }

    #[test]
    fn test_templates_have_placeholders() {
        assert!(COUNT_INSTRUCTION.contains("{{count}}"));
        assert!(TEXT_BACKGROUND.contains("{{background}}"));
        assert!(IMAGE_BACKGROUND.contains("{{instruction}}"));
    }

    #[test]
    fn test_count_instruction() {
        assert_eq!(
            count_instruction(3),
            "Combine all people from the 3 preceding images into a single, cohesive family portrait."
        );
    }

    #[test]
    fn test_system_instruction_policy() {
        assert!(SYSTEM_INSTRUCTION.contains("Virtual photographer"));
        assert!(SYSTEM_INSTRUCTION.contains("Do not omit anyone"));
        assert!(SYSTEM_INSTRUCTION.contains("one high-resolution image"));
    }
}
