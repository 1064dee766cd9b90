//! Request command - build the payload sent to the invoice generator.

use clap::Args;

use factura_core::GenerationRequest;

/// Arguments for the request command.
#[derive(Args)]
pub struct RequestArgs {
    /// Natural-language description of the invoice
    #[arg(required = true, num_args = 1..)]
    prompt: Vec<String>,

    /// Single-line JSON instead of indented
    #[arg(long)]
    compact: bool,
}

pub async fn run(args: RequestArgs) -> anyhow::Result<()> {
    let prompt = args.prompt.join(" ");
    if prompt.trim().is_empty() {
        anyhow::bail!("Prompt is empty");
    }

    let request = GenerationRequest::new(prompt);
    let output = if args.compact {
        serde_json::to_string(&request)?
    } else {
        serde_json::to_string_pretty(&request)?
    };
    println!("{}", output);

    Ok(())
}
