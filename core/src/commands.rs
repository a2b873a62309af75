use crate::params::{FrontendParams, OutputLimit, Section, DEFAULT_SHOW};

/// A query is routed to the command handler when it starts with `/` or is a
/// single digit 1-9.
pub fn is_command(query: &str) -> bool {
    let q = query.trim();
    q.starts_with('/') || (q.len() == 1 && matches!(q.as_bytes()[0], b'1'..=b'9'))
}

/// Apply one command to the frontend parameters and return a status message.
/// Unrecognized commands leave the parameters unchanged.
pub fn apply_command(query: &str, params: &mut FrontendParams) -> String {
    let q = query.trim();
    let mut parts = q.split_whitespace();
    let head = parts.next().unwrap_or("");
    let arg = parts.next();

    match head {
        "/help" => help_text(),
        "/show" => match arg {
            Some(name) => select_section(&name.to_lowercase(), params),
            None => "Usage: /show <dict|pairs|category|tags|titles|descr|meta|id|whole|agents|all>"
                .to_string(),
        },
        "/mode" => match arg {
            Some("relevancy") => {
                params.relevancy_mode = true;
                "Relevancy mode enabled".to_string()
            }
            Some("normal") => {
                params.relevancy_mode = false;
                "Normal mode enabled".to_string()
            }
            Some(other) => format!("Unknown mode: {other}"),
            None => "Usage: /mode <relevancy|normal>".to_string(),
        },
        "/tune" => match arg {
            Some("on") => {
                params.fine_tune_mode = true;
                "Fine-tuning enabled".to_string()
            }
            Some("off") => {
                params.fine_tune_mode = false;
                "Fine-tuning disabled".to_string()
            }
            Some(other) => format!("Unknown tune mode: {other}"),
            None => "Usage: /tune <on|off>".to_string(),
        },
        "/limit" => match arg.map(str::parse::<usize>) {
            Some(Ok(0)) => {
                params.output_limit = OutputLimit::NoLimit;
                "Output truncation disabled".to_string()
            }
            Some(Ok(n)) => {
                params.output_limit = OutputLimit::Lines(n);
                format!("Output limit set to {n} lines")
            }
            Some(Err(_)) => format!("Invalid limit: {}", arg.unwrap_or("")),
            None => "Usage: /limit <n>".to_string(),
        },
        "/min" => match arg.map(str::parse::<usize>) {
            Some(Ok(n)) => {
                params.min_output_list_size = n;
                format!("Minimum output list size set to {n}")
            }
            Some(Err(_)) => format!("Invalid minimum size: {}", arg.unwrap_or("")),
            None => "Usage: /min <n>".to_string(),
        },
        "1" => select_section("dict", params),
        "2" => select_section("pairs", params),
        "3" => select_section("category", params),
        "4" => select_section("tags", params),
        "5" => select_section("titles", params),
        "6" => select_section("id", params),
        "7" => select_section("whole", params),
        "8" => select_section("all", params),
        "9" => {
            params.output_limit = OutputLimit::Clear;
            "Display cleared".to_string()
        }
        other => format!("Unrecognized command: {other}. Type /help for the command list."),
    }
}

fn select_section(name: &str, params: &mut FrontendParams) -> String {
    if name == "all" {
        params.show = DEFAULT_SHOW.to_vec();
        return "Showing all sections".to_string();
    }
    match Section::parse(name) {
        Some(section) => {
            params.show = vec![section];
            match section {
                Section::Dict => "Showing dictionary entries".to_string(),
                Section::Pairs => "Showing word pairs".to_string(),
                Section::Category => "Showing categories".to_string(),
                Section::Tags => "Showing tags".to_string(),
                Section::Titles => "Showing titles".to_string(),
                Section::Descriptions => "Showing descriptions".to_string(),
                Section::Meta => "Showing meta entries".to_string(),
                Section::Id => "Showing ID entries".to_string(),
                Section::Whole => "Showing whole content".to_string(),
                Section::Agents => "Showing agent entries".to_string(),
            }
        }
        None => format!("Unknown section: {name}"),
    }
}

fn help_text() -> String {
    [
        "Available commands:",
        "  /show <section>   - Show results for one section",
        "                       (dict, pairs, category, tags, titles, descr, meta, id, whole, agents, all)",
        "  /mode <mode>      - Set mode (relevancy, normal)",
        "  /tune <on|off>    - Enable or disable fine-tuning",
        "  /limit <n>        - Set maximum output lines (0 disables truncation)",
        "  /min <n>          - Set minimum output list size",
        "  1-9               - Shortcuts for display options (9 clears the display)",
    ]
    .join("\n")
}
