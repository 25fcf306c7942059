use futures_util::StreamExt;
use mural_client::{
    api::ApiClient,
    session::{Session, SubmitOutcome},
};
use mural_shared::{
    messages::MessageResponse,
    settings::get_settings,
    telemetry::{get_subscriber, init_subscriber},
    websocket::WebSocketMessage,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_tungstenite::{connect_async, tungstenite::Message};

fn print_message(message: &MessageResponse) {
    println!(
        "[{}] {}: {}",
        message.created_at.format("%Y-%m-%d %H:%M"),
        message.author,
        message.body
    );
}

async fn submit_line(session: &mut Session, line: &str) {
    let (author, body) = match line.split_once(':') {
        Some(parts) => parts,
        None => {
            println!("Use \"name: message\".");
            return;
        }
    };

    match session.submit(author.trim(), body.trim()).await {
        SubmitOutcome::Accepted(message) => print_message(&message),
        SubmitOutcome::Ignored => println!("Name and message are both required."),
        SubmitOutcome::Busy => (),
        SubmitOutcome::Failed => println!("Could not send your message, try again."),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let subscriber = get_subscriber("mural-client".into(), "warn".into(), std::io::stderr);
    init_subscriber(subscriber);

    let settings = get_settings().expect("Failed to read settings");

    let mut session = Session::new(ApiClient::new(settings.client.api_url));

    // The live subscription is opened alongside the baseline load; either
    // leg failing degrades the view instead of ending the session.
    let subscription = match connect_async(&settings.client.websocket_url).await {
        Ok((stream, _)) => Some(stream),
        Err(error) => {
            tracing::warn!("Live subscription unavailable: {:?}", error);
            None
        }
    };

    session.load_baseline().await;

    for message in session.view.messages().iter().rev() {
        print_message(message);
    }

    println!("Leave a message as \"name: message\", Ctrl-D to quit.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    match subscription {
        Some(mut stream) => loop {
            tokio::select! {
                frame = stream.next() => match frame {
                    Some(Ok(Message::Text(text))) => {
                        if let Ok(event) = serde_json::from_str::<WebSocketMessage>(&text) {
                            if let Some(message) = session.apply_event(event) {
                                print_message(&message);
                            }
                        }
                    }
                    Some(Ok(_)) => (),
                    Some(Err(error)) => {
                        tracing::warn!("Live subscription failed: {:?}", error);
                        break;
                    }
                    None => break,
                },
                line = lines.next_line() => match line? {
                    Some(line) => submit_line(&mut session, &line).await,
                    None => break,
                },
            }
        },
        None => {
            while let Some(line) = lines.next_line().await? {
                submit_line(&mut session, &line).await;
            }
        }
    }

    Ok(())
}
