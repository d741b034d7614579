//! Real-time collaboration server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin kyodo-server
//! cargo run --bin kyodo-server -- --host 0.0.0.0 --port 5000
//! JDOODLE_CLIENT_ID=... JDOODLE_CLIENT_SECRET=... cargo run --bin kyodo-server
//! ```

use std::{sync::Arc, time::Duration};

use clap::Parser;
use kyodo_server::{
    config::{
        CompilerConfig, CompilerCredentials, DEFAULT_COMPILE_ENDPOINT, SessionConfig,
    },
    infrastructure::{
        compiler::build_compiler, message_pusher::WebSocketMessagePusher,
        repository::InMemoryConnectionRepository, room::RoomDirectory,
    },
    ui::{Server, state::AppState},
    usecase::{
        CompileCodeUseCase, ConnectParticipantUseCase, DisconnectParticipantUseCase,
        GetRoomStatsUseCase, JoinRoomUseCase, NotifyTypingUseCase, RelayCodeUseCase,
        SendMessageUseCase,
    },
};
use kyodo_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "kyodo-server")]
#[command(about = "Real-time collaboration server for shared code rooms", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "PORT", default_value = "5000")]
    port: u16,

    /// Code execution service endpoint
    #[arg(long, default_value = DEFAULT_COMPILE_ENDPOINT)]
    compile_endpoint: String,

    /// Compile request timeout in seconds
    #[arg(long, default_value = "10")]
    compile_timeout_secs: u64,

    /// Code execution service client ID
    #[arg(long, env = "JDOODLE_CLIENT_ID", hide_env_values = true)]
    jdoodle_client_id: Option<String>,

    /// Code execution service client secret
    #[arg(long, env = "JDOODLE_CLIENT_SECRET", hide_env_values = true)]
    jdoodle_client_secret: Option<String>,
}

impl Args {
    fn compiler_config(&self) -> CompilerConfig {
        let credentials = match (&self.jdoodle_client_id, &self.jdoodle_client_secret) {
            (Some(client_id), Some(client_secret))
                if !client_id.is_empty() && !client_secret.is_empty() =>
            {
                Some(CompilerCredentials {
                    client_id: client_id.clone(),
                    client_secret: client_secret.clone(),
                })
            }
            _ => None,
        };
        CompilerConfig {
            endpoint: self.compile_endpoint.clone(),
            timeout: Duration::from_secs(self.compile_timeout_secs),
            credentials,
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. Repository
    // 2. MessagePusher
    // 3. RoomDirectory
    // 4. Compiler
    // 5. UseCases
    // 6. Server

    // 1. Create Repository (in-memory connection registry)
    let repository = Arc::new(InMemoryConnectionRepository::new());

    // 2. Create MessagePusher (WebSocket implementation)
    let message_pusher = Arc::new(WebSocketMessagePusher::new());

    // 3. Create RoomDirectory (one actor per active room)
    let rooms = Arc::new(RoomDirectory::new(
        message_pusher.clone(),
        SessionConfig::default(),
    ));

    // 4. Create Compiler (demo output without credentials)
    let compiler_config = args.compiler_config();
    if compiler_config.credentials.is_none() {
        tracing::warn!("JDoodle credentials not set, using mock compilation");
    }
    let compiler = match build_compiler(&compiler_config) {
        Ok(compiler) => compiler,
        Err(e) => {
            tracing::error!("Failed to create compiler: {}", e);
            std::process::exit(1);
        }
    };

    // 5. Create UseCases
    let clock = Arc::new(SystemClock);
    let app_state = AppState {
        connect_participant_usecase: Arc::new(ConnectParticipantUseCase::new(
            repository.clone(),
            message_pusher.clone(),
        )),
        disconnect_participant_usecase: Arc::new(DisconnectParticipantUseCase::new(
            repository.clone(),
            message_pusher.clone(),
            rooms.clone(),
        )),
        join_room_usecase: Arc::new(JoinRoomUseCase::new(repository.clone(), rooms.clone())),
        relay_code_usecase: Arc::new(RelayCodeUseCase::new(repository.clone(), rooms.clone())),
        send_message_usecase: Arc::new(SendMessageUseCase::new(
            repository.clone(),
            rooms.clone(),
            clock.clone(),
        )),
        notify_typing_usecase: Arc::new(NotifyTypingUseCase::new(
            repository.clone(),
            rooms.clone(),
        )),
        get_room_stats_usecase: Arc::new(GetRoomStatsUseCase::new(repository, rooms)),
        compile_code_usecase: Arc::new(CompileCodeUseCase::new(compiler)),
        clock,
    };

    // 6. Create and run the server
    let server = Server::new(app_state);
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
