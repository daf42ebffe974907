// Numbered device menu
use super::console::Console;
use super::types::Candidate;
use crate::adb::{AdbError, AdbResult};
use std::io;

/// 1-based menu choice to 0-based index; digits only, within `1..=count`.
pub fn parse_choice(input: &str, count: usize) -> Option<usize> {
    let input = input.trim();
    if input.is_empty() || !input.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    match input.parse::<usize>() {
        Ok(n) if (1..=count).contains(&n) => Some(n - 1),
        _ => None,
    }
}

/// Show the menu and keep asking until a valid entry arrives.
/// Input that is not valid UTF-8 counts as an invalid entry; end-of-input or
/// any other read error aborts the run.
pub async fn choose<C: Console>(
    console: &mut C,
    heading: &str,
    candidates: &[Candidate],
) -> AdbResult<usize> {
    let count = candidates.len();
    console.status(heading);
    console.status("");
    for (i, c) in candidates.iter().enumerate() {
        console.status(&format!("  {}. {} ({})", i + 1, c.name, c.device.serial));
    }
    console.status("");

    loop {
        console.prompt(&format!("Select device (1-{count}): "));
        let line = match console.read_line().await {
            Ok(Some(line)) => line,
            Ok(None) => return Err(AdbError::InteractionAborted),
            Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                log::debug!("Unreadable selection: {e}");
                String::new()
            }
            Err(e) => {
                log::debug!("Reading selection failed: {e}");
                return Err(AdbError::InteractionAborted);
            }
        };
        if let Some(index) = parse_choice(&line, count) {
            return Ok(index);
        }
        console.status(&format!(
            "Invalid selection. Enter a number between 1 and {count}."
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adb::Device;
    use crate::wireless::console::scripted::ScriptedConsole;

    fn candidates() -> Vec<Candidate> {
        vec![
            Candidate {
                device: Device::new("aaa"),
                name: "google Pixel 7".to_string(),
            },
            Candidate {
                device: Device::new("bbb"),
                name: "samsung SM-G991B".to_string(),
            },
        ]
    }

    #[test]
    fn test_parse_choice_accepts_only_menu_numbers() {
        assert_eq!(parse_choice("1", 2), Some(0), "first entry maps to index 0");
        assert_eq!(parse_choice("2\n", 2), Some(1), "trailing newline is trimmed");
        assert_eq!(parse_choice("0", 2), None, "menu is 1-based");
        assert_eq!(parse_choice("3", 2), None, "past the last entry");
        assert_eq!(parse_choice("abc", 2), None, "not a number");
        assert_eq!(parse_choice("-1", 2), None, "sign is not a digit");
        assert_eq!(parse_choice("", 2), None, "empty entry");
    }

    #[tokio::test]
    async fn test_invalid_entry_reprompts() {
        let mut console = ScriptedConsole::with_input(&["abc", "2"]);
        let index = choose(&mut console, "Multiple devices found:", &candidates())
            .await
            .unwrap();
        assert_eq!(index, 1, "second answer selects the second device");
        assert_eq!(
            console.prompts,
            vec!["Select device (1-2): "; 2],
            "invalid entry should re-prompt once"
        );
        assert!(
            console.out.contains(&"  2. samsung SM-G991B (bbb)".to_string()),
            "menu lists name and serial"
        );
        assert!(
            console
                .out
                .contains(&"Invalid selection. Enter a number between 1 and 2.".to_string()),
            "operator is told why the entry was rejected"
        );
    }

    #[tokio::test]
    async fn test_non_utf8_entry_reprompts() {
        let mut console =
            ScriptedConsole::with_input(&["1"]).read_error_first(io::ErrorKind::InvalidData);
        let index = choose(&mut console, "Multiple devices found:", &candidates())
            .await
            .expect("undecodable input should not abort selection");
        assert_eq!(index, 0, "next valid entry is accepted");
        assert_eq!(console.prompts.len(), 2, "undecodable entry should re-prompt");
        assert!(
            console
                .out
                .contains(&"Invalid selection. Enter a number between 1 and 2.".to_string()),
            "undecodable entry is reported like any invalid entry"
        );
    }

    #[tokio::test]
    async fn test_other_read_error_aborts() {
        let mut console =
            ScriptedConsole::with_input(&["1"]).read_error_first(io::ErrorKind::BrokenPipe);
        let err = choose(&mut console, "Multiple devices found:", &candidates())
            .await
            .unwrap_err();
        assert!(
            matches!(err, AdbError::InteractionAborted),
            "unreadable stdin ends the run, got {err:?}"
        );
        assert_eq!(console.prompts.len(), 1, "no re-prompt after a broken stream");
    }

    #[tokio::test]
    async fn test_end_of_input_aborts() {
        let mut console = ScriptedConsole::with_input(&["9"]);
        let err = choose(&mut console, "Multiple devices found:", &candidates())
            .await
            .unwrap_err();
        assert!(
            matches!(err, AdbError::InteractionAborted),
            "end-of-input during selection aborts, got {err:?}"
        );
        assert_eq!(console.prompts.len(), 2, "one prompt per read attempt");
    }
}
