/// A [SourceCommand] is a message that can be sent to a running
/// [super::SourceDriver] over a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceCommand {
    Stop,
}
