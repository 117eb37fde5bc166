use clap::Subcommand;

use super::chat::ChatArgs;
use super::perceive::PerceiveArgs;
use super::serve::ServeArgs;

#[derive(Subcommand, Clone)]
pub enum Commands {
    /// Print the serialized context the model sees for a page
    Perceive(PerceiveArgs),

    /// Talk to the agent about a page and watch it act
    Chat(ChatArgs),

    /// Serve the chat endpoint over HTTP
    Serve(ServeArgs),
}
