use anyhow::Result;
use daybook_core::DaybookResult;
use dialoguer::Input;
use owo_colors::OwoColorize;

/// Prompt until `parse` accepts the input.
///
/// With `optional`, an empty answer is passed through to `parse` instead of
/// being refused by the prompt.
pub fn prompt_with_retry<T, F>(prompt: &str, optional: bool, parse: F) -> Result<T>
where
    F: Fn(&str) -> DaybookResult<T>,
{
    loop {
        let input: String = if optional {
            Input::new()
                .with_prompt(prompt)
                .default(String::new())
                .show_default(false)
                .interact_text()?
        } else {
            Input::new().with_prompt(prompt).interact_text()?
        };

        match parse(&input) {
            Ok(value) => return Ok(value),
            Err(e) => {
                eprintln!("  {}", e.to_string().red());
            }
        }
    }
}
