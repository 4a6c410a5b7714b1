use clap::Parser;

mod cli;
mod commands;
mod document;
mod domain;
mod helper;
mod services;

use domain::error::SwapError;

fn main() {
    let args = cli::Cli::parse();
    let json = args.json;
    if let Err(err) = commands::handle_command(&args) {
        if json {
            let envelope = serde_json::json!({
                "ok": false,
                "error": { "code": error_code(&err), "message": format!("{:#}", err) }
            });
            println!("{}", envelope);
        } else {
            eprintln!("error: {:#}", err);
        }
        std::process::exit(1);
    }
}

fn error_code(err: &anyhow::Error) -> &'static str {
    if let Some(e) = err.downcast_ref::<SwapError>() {
        e.code()
    } else if err.downcast_ref::<document::DocumentError>().is_some() {
        "INPUT_ABSENT"
    } else {
        "ERROR"
    }
}
