use chrono::Local;
use quote_tool::{
    ClientType, HtmlRenderer, QuoteConfig, QuoteEngine, QuoteOutcome, QuoteRequest,
    calculations::RowPricing, catalog, export_rows_to_csv, format::format_count,
    format::format_percent, format_currency, load_request_from_json, render_documents,
    save_reports_to_json, validation, write_documents,
};
use std::io::{self, Write};
use std::path::Path;
use std::str::FromStr;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn render_text_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (ci, cell) in row.iter().enumerate() {
            let len = cell.chars().count();
            if ci < widths.len() && len > widths[ci] {
                widths[ci] = len;
            }
        }
    }

    let mut sep = String::new();
    sep.push('+');
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    push_table_line(&mut out, headers.iter().copied(), &widths);
    out.push_str(&sep);
    out.push('\n');
    for row in rows {
        push_table_line(&mut out, row.iter().map(String::as_str), &widths);
    }
    out.push_str(&sep);
    out.push('\n');
    out
}

fn push_table_line<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    out.push('|');
    for (cell, width) in cells.zip(widths) {
        out.push(' ');
        out.push_str(cell);
        let pad = width.saturating_sub(cell.chars().count());
        if pad > 0 {
            out.push_str(&" ".repeat(pad));
        }
        out.push_str(" |");
    }
    out.push('\n');
}

fn render_rows(rows: &[RowPricing], symbol: &str) -> String {
    let headers = [
        "Row",
        "Role",
        "Count",
        "Hours",
        "Compensation",
        "Emp Cost / Hr",
        "Overhead / Hr",
        "Margin / Hr",
        "Total Hours",
        "Internal Cost",
        "Internal Cost + Overhead",
        "Margin",
    ];
    let lines: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            vec![
                row.assignment_id.to_string(),
                row.role.clone().unwrap_or_default(),
                row.count.to_string(),
                row.hours.to_string(),
                format_currency(row.compensation, symbol),
                format_currency(row.employee_cost_per_hour, symbol),
                format_currency(row.overhead_per_hour, symbol),
                format_currency(row.margin_per_hour, symbol),
                format_count(row.total_hours),
                format_currency(row.internal_cost, symbol),
                format_currency(row.internal_cost_plus_overhead, symbol),
                format_currency(row.margin_amount, symbol),
            ]
        })
        .collect();
    render_text_table(&headers, &lines)
}

fn render_outcome(request: &QuoteRequest, outcome: &QuoteOutcome) -> String {
    let symbol = outcome.currency_symbol.as_str();
    let totals = &outcome.totals;
    let mut out = render_rows(&outcome.rows, symbol);
    out.push_str(&format!(
        "Total Resource Count              : {}\n",
        format_count(totals.total_resource_count)
    ));
    out.push_str(&format!(
        "Total Project Duration            : {} Hrs ({} days)\n",
        format_count(totals.total_project_hours),
        format_count(totals.total_project_days)
    ));
    out.push_str(&format!(
        "Total Internal Cost               : {}\n",
        format_currency(totals.total_internal_cost, symbol)
    ));
    out.push_str(&format!(
        "Total Internal Cost + Overhead    : {}\n",
        format_currency(totals.total_internal_cost_plus_overhead, symbol)
    ));
    out.push_str(&format!(
        "Total Margin Cost                 : {}\n",
        format_currency(totals.total_margin_amount, symbol)
    ));
    out.push_str(&format!(
        "Offered Discount                  : {}\n",
        format_percent(f64::from(totals.discount_percent))
    ));
    out.push_str(&format!(
        "Discounted Amount                 : {}\n",
        format_currency(totals.discount_amount, symbol)
    ));
    out.push_str(&format!(
        "Total Project Amount              : {}\n",
        format_currency(totals.final_amount_after_discount, symbol)
    ));

    if request.milestones.is_configured() {
        let lines: Vec<Vec<String>> = outcome
            .milestones
            .iter()
            .map(|m| {
                vec![
                    m.milestone_id.to_string(),
                    m.name.clone(),
                    m.description.clone(),
                    format_percent(m.percent),
                    format_currency(m.amount as f64, symbol),
                ]
            })
            .collect();
        out.push_str(&render_text_table(
            &["Id", "Milestone", "Description", "Percentage", "Amount"],
            &lines,
        ));
        out.push_str(&format!(
            "Total Allocated: {}\n",
            format_percent(request.milestones.total_percent())
        ));
    }
    out
}

fn print_help() {
    println!(
        "Commands:\n  help                               Show this help\n  show                               Show the current quotation\n  roles                              List roles and their base compensation\n  meta show                          Show project details\n  meta name <text...>                Set project name\n  meta desc <text...>                Set project description\n  client <domestic|international>    Set client type\n  overhead <float>                   Set overhead factor (1.0 - 2.0)\n  margin <10|20|30|40|50>            Set margin percent\n  discount <0-100>                   Set discount percent\n  row add                            Append an empty team row\n  row role <id> <role...>            Select the role of a row\n  row clear <id>                     Clear the role of a row\n  row count <id> <n>                 Set resource count\n  row hours <id> <n>                 Set hours per resource\n  row del <id>                       Delete a row\n  ms create                          Start a milestone breakdown\n  ms add                             Append a milestone\n  ms name <id> <text...>             Set milestone name\n  ms desc <id> <text...>             Set milestone description\n  ms pct <id> <float>                Set milestone percentage\n  ms del <id>                        Delete a milestone\n  doc user <ref...>                  Attach user requirement document reference\n  doc functional <ref...>            Attach functional requirement document reference\n  gate                               Show whether reports can be generated\n  load <json_path>                   Load a quotation request from JSON\n  export <dir>                       Write reports, documents and cost breakdown to dir\n  compute                            Recompute and show the quotation\n  quit|exit                          Exit"
    );
}

fn print_roles() {
    for role in catalog::roles() {
        println!(
            "  {:<28} {}",
            role.name,
            format_currency(role.base_compensation, ClientType::Domestic.currency_symbol())
        );
    }
}

fn print_metadata(engine: &QuoteEngine, request: &QuoteRequest) {
    println!("Project name       : {}", request.project.name);
    println!("Project description: {}", request.project.description);
    println!("Client type        : {}", request.factors.client_type);
    println!("Overhead factor    : {:.1}", request.factors.overhead_factor);
    println!("Margin percent     : {}%", request.factors.margin_percent);
    println!("Discount percent   : {}%", request.factors.discount_percent);
    println!("USD/INR rate       : {}", engine.config().usd_inr_rate);
}

fn parse_id(value: Option<&str>) -> Option<u32> {
    value.and_then(|v| v.parse::<u32>().ok())
}

fn show(engine: &QuoteEngine, request: &QuoteRequest) {
    match engine.quote(request) {
        Ok(outcome) => println!("{}", render_outcome(request, &outcome)),
        Err(e) => println!("Error: {}", e),
    }
}

fn export(engine: &QuoteEngine, request: &QuoteRequest, dir: &str) {
    let outcome = match engine.quote(request) {
        Ok(outcome) => outcome,
        Err(e) => {
            println!("Error: {}", e);
            return;
        }
    };
    let bundle = match engine.reports(request, Local::now().naive_local()) {
        Ok(bundle) => bundle,
        Err(e) => {
            println!("Export unavailable: {}", e);
            return;
        }
    };
    let Some(documents) = render_documents(&HtmlRenderer, &bundle) else {
        println!("Report rendering failed; nothing written.");
        return;
    };
    let dir = Path::new(dir);
    let result = write_documents(&documents, dir)
        .and_then(|paths| save_reports_to_json(&bundle, dir.join("reports.json")).map(|_| paths))
        .and_then(|paths| {
            export_rows_to_csv(&outcome.rows, dir.join("cost_breakdown.csv")).map(|_| paths)
        });
    match result {
        Ok((internal, client)) => {
            println!("Internal report written to {}.", internal.display());
            println!("Client report written to {}.", client.display());
            println!("Exported to {}.", dir.display());
        }
        Err(e) => println!("Error exporting: {}", e),
    }
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(io::stderr))
        .with(filter)
        .init();

    let config = match QuoteConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Falling back to default configuration: {}", e);
            QuoteConfig::default()
        }
    };
    let engine = QuoteEngine::new(config);
    let mut request = engine.new_request();

    println!("Quotation Calculator (CLI) - type 'help' for commands\n");
    show(&engine, &request);

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        match stdin.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");

        match cmd {
            "help" => print_help(),
            "quit" | "exit" => break,
            "show" | "compute" => show(&engine, &request),
            "roles" => print_roles(),
            "meta" => {
                let sub = parts.next();
                let rest = parts.collect::<Vec<_>>().join(" ");
                match sub {
                    Some("show") => print_metadata(&engine, &request),
                    Some("name") if !rest.is_empty() => {
                        request.project.name = rest;
                        println!("Project name updated.");
                    }
                    Some("desc") => {
                        request.project.description = rest;
                        println!("Project description updated.");
                    }
                    _ => println!("Usage: meta <show|name|desc> [text...]"),
                }
            }
            "client" => match parts.next().map(ClientType::from_str) {
                Some(Ok(client_type)) => {
                    request.factors.client_type = client_type;
                    println!("Client type set to {}.", client_type);
                    show(&engine, &request);
                }
                Some(Err(e)) => println!("Error: {}", e),
                None => println!("Usage: client <domestic|international>"),
            },
            "overhead" | "margin" | "discount" => {
                let value = parts.next();
                let mut factors = request.factors.clone();
                let parsed = match cmd {
                    "overhead" => value
                        .and_then(|v| v.parse::<f64>().ok())
                        .map(|v| factors.overhead_factor = v),
                    "margin" => value
                        .and_then(|v| v.parse::<u8>().ok())
                        .map(|v| factors.margin_percent = v),
                    _ => value
                        .and_then(|v| v.parse::<u8>().ok())
                        .map(|v| factors.discount_percent = v),
                };
                if parsed.is_none() {
                    println!("Usage: {} <value>", cmd);
                    continue;
                }
                match validation::validate_factors(&factors) {
                    Ok(()) => {
                        request.factors = factors;
                        println!("{} set.", cmd);
                        show(&engine, &request);
                    }
                    Err(e) => println!("Error: {}", e),
                }
            }
            "row" => {
                let sub = parts.next();
                match sub {
                    Some("add") => match request.team.add_row() {
                        Ok(id) => println!("Added row {}.", id),
                        Err(e) => println!("Error: {}", e),
                    },
                    Some("role") => {
                        let id = parse_id(parts.next());
                        let role = parts.collect::<Vec<_>>().join(" ");
                        match id {
                            Some(id) if !role.is_empty() => {
                                match request.team.set_role(id, Some(&role)) {
                                    Ok(()) => {
                                        println!("Row {} role set to {}.", id, role);
                                        show(&engine, &request);
                                    }
                                    Err(e) => println!("Error: {}", e),
                                }
                            }
                            _ => println!("Usage: row role <id> <role...>"),
                        }
                    }
                    Some("clear") => match parse_id(parts.next()) {
                        Some(id) => match request.team.set_role(id, None) {
                            Ok(()) => println!("Row {} cleared.", id),
                            Err(e) => println!("Error: {}", e),
                        },
                        None => println!("Usage: row clear <id>"),
                    },
                    Some(field @ ("count" | "hours")) => {
                        let id = parse_id(parts.next());
                        let value = parse_id(parts.next());
                        match (id, value) {
                            (Some(id), Some(value)) => {
                                let res = if field == "count" {
                                    request.team.set_count(id, value)
                                } else {
                                    request.team.set_hours(id, value)
                                };
                                match res {
                                    Ok(()) => {
                                        println!("Row {} {} set.", id, field);
                                        show(&engine, &request);
                                    }
                                    Err(e) => println!("Error: {}", e),
                                }
                            }
                            _ => println!("Usage: row {} <id> <non-negative integer>", field),
                        }
                    }
                    Some("del") => match parse_id(parts.next()) {
                        Some(id) => {
                            if request.team.remove_row(id) {
                                println!("Deleted row {}.", id);
                            } else {
                                println!("Row {} not found.", id);
                            }
                        }
                        None => println!("Usage: row del <id>"),
                    },
                    _ => println!("Usage: row <add|role|clear|count|hours|del> ..."),
                }
            }
            "ms" => {
                let sub = parts.next();
                match sub {
                    Some("create") => match request.milestones.create() {
                        Ok(()) => println!("Milestone breakdown started."),
                        Err(e) => println!("Error: {}", e),
                    },
                    Some("add") => match request.milestones.add() {
                        Ok(id) => println!("Added milestone {}.", id),
                        Err(e) => println!("Error: {}", e),
                    },
                    Some(field @ ("name" | "desc")) => {
                        let id = parse_id(parts.next());
                        let text = parts.collect::<Vec<_>>().join(" ");
                        match id {
                            Some(id) => {
                                let res = if field == "name" {
                                    request.milestones.set_name(id, text)
                                } else {
                                    request.milestones.set_description(id, text)
                                };
                                match res {
                                    Ok(()) => println!("Milestone {} {} set.", id, field),
                                    Err(e) => println!("Error: {}", e),
                                }
                            }
                            None => println!("Usage: ms {} <id> <text...>", field),
                        }
                    }
                    Some("pct") => {
                        let id = parse_id(parts.next());
                        let pct = parts.next().and_then(|v| v.parse::<f64>().ok());
                        match (id, pct) {
                            (Some(id), Some(pct)) => match request.milestones.set_percent(id, pct) {
                                Ok(()) => {
                                    println!("Milestone {} percentage set.", id);
                                    let total = request.milestones.total_percent();
                                    if total > 100.0 {
                                        println!("Warning: total milestone percentage cannot exceed 100%");
                                    }
                                }
                                Err(e) => println!("Error: {}", e),
                            },
                            _ => println!("Usage: ms pct <id> <float>"),
                        }
                    }
                    Some("del") => match parse_id(parts.next()) {
                        Some(id) => {
                            if !request.milestones.remove(id) {
                                println!("Milestone {} not found.", id);
                            } else if request.milestones.is_configured() {
                                println!("Deleted milestone {}.", id);
                            } else {
                                println!("Deleted milestone {}; milestones cleared.", id);
                            }
                        }
                        None => println!("Usage: ms del <id>"),
                    },
                    _ => println!("Usage: ms <create|add|name|desc|pct|del> ..."),
                }
            }
            "doc" => {
                let kind = parts.next();
                let reference = parts.collect::<Vec<_>>().join(" ");
                let reference = (!reference.is_empty()).then_some(reference);
                match kind {
                    Some("user") => {
                        request.documents.user_requirement = reference;
                        println!("User requirement document updated.");
                    }
                    Some("functional") => {
                        request.documents.functional_requirement = reference;
                        println!("Functional requirement document updated.");
                    }
                    _ => println!("Usage: doc <user|functional> [ref...]"),
                }
            }
            "gate" => match engine.quote(&request) {
                Ok(outcome) if outcome.can_export() => println!("Reports can be generated."),
                Ok(outcome) => {
                    println!("Reports unavailable:");
                    for reason in outcome.gate.blockers() {
                        println!("  - {}", reason);
                    }
                }
                Err(e) => println!("Error: {}", e),
            },
            "load" => match parts.next() {
                Some(path) => match load_request_from_json(path) {
                    Ok(loaded) => {
                        request = loaded;
                        println!("Quotation loaded from {}.", path);
                        show(&engine, &request);
                    }
                    Err(e) => println!("Error loading quotation: {}", e),
                },
                None => println!("Usage: load <json_path>"),
            },
            "export" => match parts.next() {
                Some(dir) => export(&engine, &request, dir),
                None => println!("Usage: export <dir>"),
            },
            _ => {
                println!("Unknown command. Type 'help'.");
            }
        }
    }
}
