use anyhow::Context;
use chatbot::{ChatBot, ChatConfig, Role};
use chrono::Local;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    init_logging()?;

    // .env is optional; the process environment still applies
    match dotenv::dotenv() {
        Ok(path) => log::info!("loaded {}", path.display()),
        Err(e) => log::info!("no .env loaded: {}", e),
    }

    let model = std::env::args().nth(1);
    let config = ChatConfig::from_env(model).context("reading configuration")?;
    let mut bot = ChatBot::from_env(config).context("creating chatbot")?;

    println!(
        "chatting with {} / {} (/history, /quit)",
        bot.provider().label(),
        bot.model()
    );

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        match line {
            "" => continue,
            "/quit" | "/exit" => break,
            "/history" => {
                for turn in bot.history() {
                    let who = match turn.role {
                        Role::User => "user",
                        Role::Assistant => "assistant",
                    };
                    println!("[{}] {}", who, turn.content);
                }
                continue;
            }
            _ => {}
        }

        match bot.get_markdown_response(line).await {
            Ok(md) => println!("{md}"),
            Err(e) => eprintln!("error: {e}"),
        }
    }
    Ok(())
}

fn init_logging() -> anyhow::Result<()> {
    let ts = Local::now().format("%Y%m%d-%H%M%S").to_string();
    let log_dir = std::path::PathBuf::from("logs");
    std::fs::create_dir_all(&log_dir)?;
    let log_file = std::fs::File::create(log_dir.join(format!("chatbot-{}.log", ts)))?;
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .filter_level(log::LevelFilter::Warn)
        .filter_module("chatbot", log::LevelFilter::Info)
        .init();
    Ok(())
}
