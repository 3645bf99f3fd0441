use replwire_client::{Client, SymbolInfo};

use crate::cmd::SymbolArgs;
use crate::exit::{client_error, CliResult, FAILURE, SUCCESS};
use crate::output::{print_json, print_responses, print_table, OutputFormat};

pub async fn run(client: &Client, args: SymbolArgs, format: OutputFormat) -> CliResult<i32> {
    let response = client
        .info(&args.symbol, args.ns.as_deref(), args.session.as_deref())
        .await
        .map_err(|err| client_error("info failed", err))?;

    if let OutputFormat::Raw = format {
        print_responses(std::slice::from_ref(&response), format);
        return Ok(SUCCESS);
    }

    let Some(info) = SymbolInfo::from_response(&response) else {
        eprintln!("no info for {}", args.symbol);
        return Ok(FAILURE);
    };

    match format {
        OutputFormat::Json => print_json(&info),
        OutputFormat::Table => print_table(&["FIELD", "VALUE"], rows(&info)),
        _ => print_pretty(&info),
    }
    Ok(SUCCESS)
}

fn rows(info: &SymbolInfo) -> Vec<Vec<String>> {
    let fields = [
        ("name", info.name.clone()),
        ("ns", info.ns.clone()),
        ("arglists", info.arglists.clone()),
        ("doc", info.doc.clone()),
        ("file", info.file.clone()),
        ("line", info.line.map(|l| l.to_string())),
        ("class", info.class.clone()),
        ("member", info.member.clone()),
    ];
    fields
        .into_iter()
        .filter_map(|(key, value)| value.map(|v| vec![key.to_string(), v]))
        .collect()
}

fn print_pretty(info: &SymbolInfo) {
    let name = match (&info.ns, &info.name) {
        (Some(ns), Some(name)) => format!("{ns}/{name}"),
        (None, Some(name)) => name.clone(),
        _ => info.class.clone().unwrap_or_default(),
    };
    if info.special_form {
        println!("{name} (special form)");
    } else {
        println!("{name}");
    }
    if let Some(arglists) = &info.arglists {
        println!("{arglists}");
    }
    if let Some(doc) = &info.doc {
        println!("  {doc}");
    }
    if let (Some(file), Some(line)) = (&info.file, info.line) {
        println!("{file}:{line}");
    }
}
