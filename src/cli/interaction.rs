//! Step renderers: an interactive dialoguer implementation and a scripted
//! one shared by the test harness and the CLI's script mode.

use std::collections::VecDeque;

use dialoguer::theme::ColorfulTheme;

use crate::cli::io;
use crate::cli::output;
use crate::schema::{FieldKind, FieldValue};
use crate::session::{StepAction, StepInteraction, StepView};

/// Interactive renderer built on dialoguer prompts.
///
/// On entering a step every field is prompted once in declaration order;
/// afterwards a navigation menu offers the actions valid at the current
/// position. Errors reported by the controller are surfaced before the user
/// is asked again.
pub struct PromptInteraction {
    theme: ColorfulTheme,
    entered_step: Option<usize>,
    pending: VecDeque<usize>,
    just_navigated: bool,
}

#[derive(Clone, Copy)]
enum MenuAction {
    Next,
    Submit,
    Previous,
    Cancel,
    EditField,
}

impl PromptInteraction {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
            entered_step: None,
            pending: VecDeque::new(),
            just_navigated: false,
        }
    }

    fn enter_step(&mut self, view: &StepView<'_>) {
        self.entered_step = Some(view.index);
        self.pending = (0..view.step.fields().len()).collect();
        output::section(format!(
            "Step {} of {} — {}",
            view.index + 1,
            view.total,
            view.step.title()
        ));
    }

    fn show_errors(&self, view: &StepView<'_>) {
        for field in view.step.fields() {
            if let Some(error) = view.errors.get(field.key()) {
                io::print_warning(format!("{}: {}", field.label(), error));
            }
        }
    }

    fn prompt_field(&mut self, view: &StepView<'_>, index: usize) -> StepAction {
        let field = &view.step.fields()[index];
        if let Some(help) = field.help() {
            io::print_info(help);
        }
        let current = view.values.get(field.key());
        let result = match field.kind() {
            FieldKind::Flag => {
                let default = matches!(current, Some(FieldValue::Flag(true)));
                io::prompt_flag(&self.theme, field.label(), default).map(FieldValue::Flag)
            }
            FieldKind::Text | FieldKind::Email => {
                let initial = match current {
                    Some(FieldValue::Text(text)) => text.as_str(),
                    _ => "",
                };
                io::prompt_text(&self.theme, field.label(), initial).map(FieldValue::text)
            }
        };
        match result {
            Ok(value) => StepAction::Edit {
                field: field.key().to_string(),
                value,
            },
            // Prompt failures (closed terminal and the like) abandon the
            // session.
            Err(_) => StepAction::Cancel,
        }
    }

    fn review_lines(&self, view: &StepView<'_>) -> Vec<String> {
        let mut lines = vec!["Review your entries:".to_string()];
        for field in view.step.fields() {
            let rendered = match view.values.get(field.key()) {
                Some(FieldValue::Text(text)) if text.is_empty() => "[unfilled]".to_string(),
                Some(FieldValue::Text(text)) => text.clone(),
                Some(FieldValue::Flag(true)) => "yes".to_string(),
                Some(FieldValue::Flag(false)) => "no".to_string(),
                None => "[unfilled]".to_string(),
            };
            lines.push(format!("  {}: {}", field.label(), rendered));
        }
        lines
    }

    fn prompt_navigation(&mut self, view: &StepView<'_>) -> StepAction {
        if view.is_last() {
            for line in self.review_lines(view) {
                io::print_info(line);
            }
        }

        let mut options: Vec<(&str, MenuAction)> = Vec::new();
        if view.is_last() {
            options.push(("Submit", MenuAction::Submit));
        } else {
            options.push(("Continue", MenuAction::Next));
        }
        options.push(("Edit a field", MenuAction::EditField));
        if view.can_go_back() {
            options.push(("Back", MenuAction::Previous));
        }
        options.push(("Cancel", MenuAction::Cancel));

        let labels: Vec<String> = options.iter().map(|(label, _)| label.to_string()).collect();
        let Ok(choice) = io::prompt_select(&self.theme, "Next action", &labels) else {
            return StepAction::Cancel;
        };
        match options[choice].1 {
            MenuAction::Next => StepAction::Next,
            MenuAction::Submit => StepAction::Submit,
            MenuAction::Previous => StepAction::Previous,
            MenuAction::Cancel => StepAction::Cancel,
            MenuAction::EditField => {
                let fields: Vec<String> = view
                    .step
                    .fields()
                    .iter()
                    .map(|field| field.label().to_string())
                    .collect();
                match io::prompt_select(&self.theme, "Which field", &fields) {
                    Ok(index) => self.prompt_field(view, index),
                    Err(_) => StepAction::Cancel,
                }
            }
        }
    }
}

impl Default for PromptInteraction {
    fn default() -> Self {
        Self::new()
    }
}

impl StepInteraction for PromptInteraction {
    fn present(&mut self, view: &StepView<'_>) -> StepAction {
        if self.entered_step != Some(view.index) {
            self.enter_step(view);
        }
        if self.just_navigated && !view.errors.is_empty() {
            self.show_errors(view);
        }
        self.just_navigated = false;

        if let Some(field_index) = self.pending.pop_front() {
            return self.prompt_field(view, field_index);
        }
        let action = self.prompt_navigation(view);
        if matches!(action, StepAction::Next | StepAction::Submit) {
            self.just_navigated = true;
        }
        action
    }
}

/// Scripted renderer: replays a fixed action sequence.
///
/// Used by the test harness and by `--script` mode, where lines come from
/// stdin: `set <field> <value…>`, `next`, `back`, `submit`, `cancel`.
/// Blank lines and `#` comments are skipped; flags accept `y|yes|true|1`
/// and `n|no|false|0`. An exhausted script cancels the session.
pub struct ScriptedInteraction {
    lines: VecDeque<String>,
    echo: bool,
    just_navigated: bool,
}

impl ScriptedInteraction {
    pub fn new(lines: impl IntoIterator<Item = String>) -> Self {
        Self {
            lines: lines.into_iter().collect(),
            echo: false,
            just_navigated: false,
        }
    }

    /// Parses a newline-delimited script.
    pub fn from_script(script: &str) -> Self {
        Self::new(
            script
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#'))
                .map(String::from),
        )
    }

    /// Echo every consumed line, so transcripts show what drove each step.
    pub fn with_echo(mut self) -> Self {
        self.echo = true;
        self
    }

    fn action_for_line(&self, line: &str, view: &StepView<'_>) -> Result<StepAction, String> {
        match line {
            "next" => return Ok(StepAction::Next),
            "back" => return Ok(StepAction::Previous),
            "submit" => return Ok(StepAction::Submit),
            "cancel" => return Ok(StepAction::Cancel),
            _ => {}
        }

        let Some(rest) = line.strip_prefix("set") else {
            return Err(format!("unrecognized script action `{line}`"));
        };
        let rest = rest.trim_start();
        let (key, raw_value) = match rest.split_once(char::is_whitespace) {
            Some((key, value)) => (key, value.trim()),
            None => (rest, ""),
        };
        if key.is_empty() {
            return Err("`set` needs a field key".to_string());
        }
        let Some(field) = view.step.field(key) else {
            return Err(format!(
                "field `{key}` is not part of step `{}`",
                view.step.name()
            ));
        };
        let value = match field.kind() {
            FieldKind::Flag => FieldValue::Flag(parse_flag(raw_value).ok_or_else(|| {
                format!("`{raw_value}` is not a boolean literal (use yes/no, true/false, or 1/0)")
            })?),
            FieldKind::Text | FieldKind::Email => FieldValue::text(raw_value),
        };
        Ok(StepAction::Edit {
            field: key.to_string(),
            value,
        })
    }
}

impl StepInteraction for ScriptedInteraction {
    fn present(&mut self, view: &StepView<'_>) -> StepAction {
        if self.just_navigated && !view.errors.is_empty() {
            for field in view.step.fields() {
                if let Some(error) = view.errors.get(field.key()) {
                    io::print_warning(format!("{}: {}", field.label(), error));
                }
            }
        }
        self.just_navigated = false;

        while let Some(line) = self.lines.pop_front() {
            if self.echo {
                io::print_info(format!("> {line}"));
            }
            match self.action_for_line(&line, view) {
                Ok(action) => {
                    if matches!(action, StepAction::Next | StepAction::Submit) {
                        self.just_navigated = true;
                    }
                    return action;
                }
                Err(reason) => io::print_warning(reason),
            }
        }
        io::print_warning("script exhausted before the wizard finished; cancelling");
        StepAction::Cancel
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" | "true" | "1" => Some(true),
        "n" | "no" | "false" | "0" => Some(false),
        _ => None,
    }
}
