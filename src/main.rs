use cablebill::application_port::*;
use cablebill::client;
use cablebill::domain_model::ApiRequest;
use cablebill::infra_terminal::TerminalNavigator;
use cablebill::logger::*;
use cablebill::settings::*;
use std::sync::Arc;
use tokio::signal;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let logger = Logger::new_bootstrap();

    let project_settings = parse_settings(cli.settings.as_deref())?;
    debug!(?project_settings);
    let logger_config = LogConfig {
        filter: project_settings.log.filter.clone(),
    };
    logger.reload_from_config(&logger_config)?;

    let api = client::try_build(&project_settings, Arc::new(TerminalNavigator::new()))?;
    if api.restore().await {
        debug!("using stored session");
    }

    let request = match cli.command {
        Command::Login { username, password } => {
            api.login(LoginInput { username, password }).await?;
            println!("Logged in.");
            return Ok(());
        }
        Command::Logout => {
            api.logout().await;
            println!("Logged out.");
            return Ok(());
        }
        Command::Get { path } => ApiRequest::get(path),
        Command::Post { path, body } => {
            let body: serde_json::Value = serde_json::from_str(&body)?;
            ApiRequest::post(path).with_json(&body)?
        }
    };

    let cancel = CancellationToken::new();
    let on_ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            on_ctrl_c.cancel();
        }
    });

    let response = api.send_cancellable(request, cancel).await?;
    let text = match response.decode::<serde_json::Value>() {
        Ok(json) => serde_json::to_string_pretty(&json)?,
        Err(_) => response.text(),
    };
    if !response.is_success() {
        return Err(anyhow::anyhow!("server answered {}: {}", response.status, text));
    }
    println!("{text}");

    Ok(())
}
