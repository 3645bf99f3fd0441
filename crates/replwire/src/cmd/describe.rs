use replwire_client::Client;
use replwire_codec::Value;

use crate::exit::{client_error, CliResult, SUCCESS};
use crate::output::{print_responses, print_table, value_text, OutputFormat};

pub async fn run(client: &Client, format: OutputFormat) -> CliResult<i32> {
    let response = client
        .describe()
        .await
        .map_err(|err| client_error("describe failed", err))?;

    let ops: Vec<&str> = response
        .get("ops")
        .and_then(Value::as_dict)
        .map(|ops| ops.keys().map(String::as_str).collect())
        .unwrap_or_default();
    let versions = response.get("versions").and_then(Value::as_dict);

    match format {
        OutputFormat::Json | OutputFormat::Raw => {
            print_responses(std::slice::from_ref(&response), format)
        }
        OutputFormat::Table => {
            let mut rows: Vec<Vec<String>> = versions
                .into_iter()
                .flatten()
                .map(|(name, version)| {
                    vec![
                        "version".to_string(),
                        format!("{name} {}", version_text(version)),
                    ]
                })
                .collect();
            rows.extend(ops.iter().map(|op| vec!["op".to_string(), op.to_string()]));
            print_table(&["KIND", "VALUE"], rows);
        }
        OutputFormat::Pretty => {
            for (name, version) in versions.into_iter().flatten() {
                println!("{name} {}", version_text(version));
            }
            println!("ops: {}", ops.join(" "));
        }
    }
    Ok(SUCCESS)
}

// Versions arrive either as a string or as {"version-string": ...}.
fn version_text(version: &Value) -> String {
    version
        .get("version-string")
        .map(value_text)
        .unwrap_or_else(|| value_text(version))
}
