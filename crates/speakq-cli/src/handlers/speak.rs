//! Speak command handler.
//!
//! Submits every text to a [`SpeechQueue`](speakq_voice::SpeechQueue) up front
//! and follows the event stream until each one has settled. Ctrl-C shuts the
//! queue up.

use anyhow::Result;

use crate::bootstrap::CliContext;

/// Execute the speak command.
#[cfg(feature = "local-playback")]
pub async fn execute(ctx: &CliContext, texts: &[String], pitch: f64, speed: f64) -> Result<()> {
    use std::sync::Arc;

    use speakq_core::{SpeechEvent, SpeechRequest};
    use speakq_voice::{LocalRenderer, SpeechQueue};

    use crate::error::CliError;

    let config = ctx.speech_config()?;
    let resolver = ctx.resolver(&config)?;
    let renderer = LocalRenderer::spawn().map_err(CliError::from)?;
    let (queue, mut events) =
        SpeechQueue::with_resolver(resolver, Arc::new(renderer), config.volume);

    for text in texts {
        queue.speak(
            SpeechRequest::new(text.clone())
                .with_pitch(pitch)
                .with_speed(speed),
        );
    }

    let mut remaining = texts.len();
    let mut failed = 0usize;
    while remaining > 0 {
        tokio::select! {
            event = events.recv() => match event {
                Some(SpeechEvent::Started { text, .. }) => println!("▶ {text}"),
                Some(SpeechEvent::Finished { .. }) => remaining -= 1,
                Some(SpeechEvent::Failed { error, .. }) => {
                    eprintln!("✗ {error}");
                    failed += 1;
                    remaining -= 1;
                }
                Some(_) => {}
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                queue.shut_up();
                println!("Stopped.");
                return Ok(());
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{failed} of {} utterance(s) could not be spoken", texts.len());
    }
    Ok(())
}

/// Execute the speak command.
///
/// This build has no audio output, so the command always fails.
#[cfg(not(feature = "local-playback"))]
#[allow(clippy::unused_async)]
pub async fn execute(ctx: &CliContext, _texts: &[String], _pitch: f64, _speed: f64) -> Result<()> {
    // Report a bad configuration ahead of the missing feature.
    ctx.speech_config()?;
    Err(crate::error::CliError::PlaybackUnavailable.into())
}
