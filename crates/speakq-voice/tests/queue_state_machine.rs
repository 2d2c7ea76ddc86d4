//! Integration tests for the `SpeechQueue` state machine.
//!
//! The synthesis backend and renderer are in-process fakes: the backend
//! "synthesizes" a text into its UTF-8 bytes and the renderer decodes them
//! back, so every test can see which text was played. No audio hardware or
//! network access is required.
//!
//! # What is tested
//!
//! - FIFO playback order and single-flight rendering
//! - Skip-on-error for synthesis and decode failures
//! - Cache-first resolution, and the cache-disabled path
//! - `shut_up` clearing the backlog and aborting the in-flight request,
//!   including one still waiting on synthesis or calling `shut_up` itself
//! - `speak_and_await` settlements and the event stream

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use speakq_cache::{MemoryStore, SpeechCache};
use speakq_core::{
    AudioCache, AudioParameters, AudioRenderer, Playback, PlaybackCompletion, SpeechConfig,
    SpeechError, SpeechEvent, SpeechRequest, SynthesisBackend,
};
use speakq_voice::SpeechQueue;
use tokio::sync::mpsc::UnboundedReceiver;

// ── Fakes ──────────────────────────────────────────────────────────

/// Synthesizes text as its UTF-8 bytes. Texts starting with `fail` error and
/// texts starting with `hang` never resolve.
#[derive(Default)]
struct FakeBackend {
    calls: Mutex<Vec<String>>,
}

impl FakeBackend {
    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SynthesisBackend for FakeBackend {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, SpeechError> {
        self.calls.lock().unwrap().push(text.to_string());
        tokio::task::yield_now().await;
        if text.starts_with("hang") {
            std::future::pending::<()>().await;
        }
        if text.starts_with("fail") {
            return Err(SpeechError::Synthesis("HTTP 500: model crashed".into()));
        }
        Ok(text.as_bytes().to_vec())
    }
}

/// Counts lookups and stores on the way to an in-memory `SpeechCache`.
struct CountingCache {
    inner: SpeechCache<MemoryStore>,
    lookups: AtomicUsize,
    stores: AtomicUsize,
}

impl CountingCache {
    fn new() -> Self {
        Self {
            inner: SpeechCache::new(MemoryStore::new()),
            lookups: AtomicUsize::new(0),
            stores: AtomicUsize::new(0),
        }
    }
}

impl AudioCache for CountingCache {
    fn lookup(&self, text: &str) -> Option<Vec<u8>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.lookup(text)
    }

    fn store(&self, text: &str, audio: &[u8]) {
        self.stores.fetch_add(1, Ordering::SeqCst);
        self.inner.store(text, audio);
    }
}

/// Renderer that "decodes" UTF-8 text. Texts containing `corrupt` fail to
/// decode.
///
/// In auto mode every playback completes immediately; otherwise completions
/// are held until the test calls [`finish_next`](Self::finish_next).
struct FakeRenderer {
    auto_complete: bool,
    played: Mutex<Vec<(String, AudioParameters)>>,
    held: Mutex<VecDeque<PlaybackCompletion>>,
    stops: AtomicUsize,
}

impl FakeRenderer {
    fn auto() -> Self {
        Self::new(true)
    }

    fn manual() -> Self {
        Self::new(false)
    }

    fn new(auto_complete: bool) -> Self {
        Self {
            auto_complete,
            played: Mutex::default(),
            held: Mutex::default(),
            stops: AtomicUsize::new(0),
        }
    }

    fn played_texts(&self) -> Vec<String> {
        self.played
            .lock()
            .unwrap()
            .iter()
            .map(|(text, _)| text.clone())
            .collect()
    }

    fn finish_next(&self) {
        let completion = self.held.lock().unwrap().pop_front();
        completion.expect("nothing is playing").complete();
    }
}

#[async_trait]
impl AudioRenderer for FakeRenderer {
    async fn start(
        &self,
        audio: Vec<u8>,
        params: AudioParameters,
    ) -> Result<Playback, SpeechError> {
        let text = String::from_utf8(audio).map_err(|e| SpeechError::Decode(e.to_string()))?;
        if text.contains("corrupt") {
            return Err(SpeechError::Decode("unrecognized format".into()));
        }
        self.played.lock().unwrap().push((text, params));

        let (playback, completion) = Playback::channel();
        if self.auto_complete {
            completion.complete();
        } else {
            self.held.lock().unwrap().push_back(completion);
        }
        Ok(playback)
    }

    fn stop(&self) {
        self.stops.fetch_add(1, Ordering::SeqCst);
        // Dropping held completions interrupts their playbacks.
        self.held.lock().unwrap().clear();
    }
}

// ── Helpers ────────────────────────────────────────────────────────

struct Harness {
    queue: SpeechQueue,
    events: UnboundedReceiver<SpeechEvent>,
    backend: Arc<FakeBackend>,
    cache: Arc<CountingCache>,
    renderer: Arc<FakeRenderer>,
}

fn config(cache_speech: bool) -> SpeechConfig {
    SpeechConfig {
        server_url: "http://tts.test".to_string(),
        cache_speech,
        volume: 1.0,
    }
}

fn harness(config: &SpeechConfig, renderer: FakeRenderer) -> Harness {
    let backend = Arc::new(FakeBackend::default());
    let cache = Arc::new(CountingCache::new());
    let renderer = Arc::new(renderer);
    let (queue, events) = SpeechQueue::new(
        config,
        Arc::clone(&backend) as Arc<dyn SynthesisBackend>,
        Arc::clone(&cache) as Arc<dyn AudioCache>,
        Arc::clone(&renderer) as Arc<dyn AudioRenderer>,
    );
    Harness {
        queue,
        events,
        backend,
        cache,
        renderer,
    }
}

/// Receive the next event, failing the test if none arrives.
async fn next_event(events: &mut UnboundedReceiver<SpeechEvent>) -> SpeechEvent {
    tokio::time::timeout(Duration::from_secs(5), events.recv())
        .await
        .expect("timed out waiting for a speech event")
        .expect("event channel closed")
}

/// Collect events up to and including the next `Idle`.
async fn until_idle(events: &mut UnboundedReceiver<SpeechEvent>) -> Vec<SpeechEvent> {
    let mut seen = Vec::new();
    loop {
        let event = next_event(events).await;
        let idle = event == SpeechEvent::Idle;
        seen.push(event);
        if idle {
            return seen;
        }
    }
}

/// Wait for the `Started` event of the next request to begin playing.
async fn until_started(events: &mut UnboundedReceiver<SpeechEvent>) -> String {
    loop {
        if let SpeechEvent::Started { text, .. } = next_event(events).await {
            return text;
        }
    }
}

/// Request that appends `start:<text>` and `end:<text>` to `log`.
fn logged(text: &str, log: &Arc<Mutex<Vec<String>>>) -> SpeechRequest {
    let start_log = Arc::clone(log);
    let end_log = Arc::clone(log);
    SpeechRequest::new(text)
        .on_start(move |r| start_log.lock().unwrap().push(format!("start:{}", r.text())))
        .on_end(move |r| end_log.lock().unwrap().push(format!("end:{}", r.text())))
}

// ── Tests ──────────────────────────────────────────────────────────

#[tokio::test]
async fn idle_queue_has_nothing_to_do() {
    let h = harness(&config(true), FakeRenderer::auto());
    assert!(!h.queue.is_speaking());
    assert_eq!(h.queue.backlog_len(), 0);

    // Shutting up an idle queue is a no-op.
    h.queue.shut_up();
    assert!(!h.queue.is_speaking());
    assert_eq!(h.renderer.stops.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn speak_marks_speaking_before_returning() {
    let mut h = harness(&config(true), FakeRenderer::auto());

    h.queue.speak(SpeechRequest::new("hello"));
    assert!(h.queue.is_speaking());

    until_idle(&mut h.events).await;
    assert!(!h.queue.is_speaking());
}

#[tokio::test]
async fn backlog_plays_in_submission_order() {
    let mut h = harness(&config(true), FakeRenderer::auto());
    let log = Arc::new(Mutex::new(Vec::new()));

    for text in ["one", "two", "three", "four"] {
        h.queue.speak(logged(text, &log));
    }
    // The first request is in flight, not in the backlog.
    assert_eq!(h.queue.backlog_len(), 3);

    until_idle(&mut h.events).await;

    assert_eq!(
        *log.lock().unwrap(),
        vec![
            "start:one", "end:one", "start:two", "end:two", "start:three", "end:three",
            "start:four", "end:four",
        ]
    );
    assert_eq!(h.renderer.played_texts(), vec!["one", "two", "three", "four"]);
}

#[tokio::test]
async fn only_one_request_renders_at_a_time() {
    let mut h = harness(&config(true), FakeRenderer::manual());
    let active = Arc::new(AtomicUsize::new(0));
    let max_active = Arc::new(AtomicUsize::new(0));

    for text in ["a", "b", "c"] {
        let (on_start, on_end) = (Arc::clone(&active), Arc::clone(&active));
        let max = Arc::clone(&max_active);
        h.queue.speak(
            SpeechRequest::new(text)
                .on_start(move |_| {
                    let now = on_start.fetch_add(1, Ordering::SeqCst) + 1;
                    max.fetch_max(now, Ordering::SeqCst);
                })
                .on_end(move |_| {
                    on_end.fetch_sub(1, Ordering::SeqCst);
                }),
        );
    }

    for expected in ["a", "b", "c"] {
        assert_eq!(until_started(&mut h.events).await, expected);
        // Give any would-be second playback a chance to sneak in.
        tokio::task::yield_now().await;
        assert_eq!(h.renderer.played_texts().last().map(String::as_str), Some(expected));
        assert_eq!(h.renderer.held.lock().unwrap().len(), 1);
        h.renderer.finish_next();
    }

    until_idle(&mut h.events).await;
    assert_eq!(max_active.load(Ordering::SeqCst), 1);
    assert_eq!(active.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn failed_synthesis_is_skipped() {
    let mut h = harness(&config(true), FakeRenderer::auto());
    let log = Arc::new(Mutex::new(Vec::new()));

    let a = logged("fail: A", &log);
    let a_id = a.id();
    let a_handle = h.queue.speak_and_await(a);
    h.queue.speak(logged("B", &log));
    h.queue.speak(logged("C", &log));

    let events = until_idle(&mut h.events).await;

    assert!(matches!(a_handle.wait().await, Err(SpeechError::Synthesis(_))));
    assert_eq!(
        *log.lock().unwrap(),
        vec!["start:B", "end:B", "start:C", "end:C"]
    );
    assert!(events.iter().any(
        |e| matches!(e, SpeechEvent::Failed { id, error } if *id == a_id && error.contains("model crashed"))
    ));
    assert!(!h.queue.is_speaking());
}

#[tokio::test]
async fn decode_failure_is_skipped() {
    let mut h = harness(&config(true), FakeRenderer::auto());
    let log = Arc::new(Mutex::new(Vec::new()));

    h.queue.speak(logged("corrupt audio", &log));
    h.queue.speak(logged("fine", &log));
    let handle = h.queue.speak_and_await(logged("also fine", &log));

    assert_eq!(handle.wait().await, Ok(()));
    until_idle(&mut h.events).await;

    assert_eq!(
        *log.lock().unwrap(),
        vec!["start:fine", "end:fine", "start:also fine", "end:also fine"]
    );
}

#[tokio::test]
async fn repeated_text_is_synthesized_once_when_caching() {
    let mut h = harness(&config(true), FakeRenderer::auto());

    for _ in 0..3 {
        h.queue.speak(SpeechRequest::new("cached phrase"));
    }
    until_idle(&mut h.events).await;

    assert_eq!(h.backend.calls(), vec!["cached phrase"]);
    assert_eq!(h.cache.lookups.load(Ordering::SeqCst), 3);
    assert_eq!(h.cache.stores.load(Ordering::SeqCst), 1);
    assert_eq!(h.renderer.played_texts(), vec!["cached phrase"; 3]);
}

#[tokio::test]
async fn pitch_and_speed_do_not_split_the_cache() {
    let mut h = harness(&config(true), FakeRenderer::auto());

    h.queue.speak(SpeechRequest::new("same words"));
    h.queue.speak(
        SpeechRequest::new("same words")
            .with_pitch(1.5)
            .with_speed(0.5),
    );
    until_idle(&mut h.events).await;

    assert_eq!(h.backend.calls().len(), 1);
}

#[tokio::test]
async fn disabled_cache_always_synthesizes() {
    let mut h = harness(&config(false), FakeRenderer::auto());

    for _ in 0..3 {
        h.queue.speak(SpeechRequest::new("uncached"));
    }
    until_idle(&mut h.events).await;

    assert_eq!(h.backend.calls().len(), 3);
    assert_eq!(h.cache.lookups.load(Ordering::SeqCst), 0);
    assert_eq!(h.cache.stores.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn shut_up_discards_backlog_and_aborts_playback() {
    let mut h = harness(&config(true), FakeRenderer::manual());
    let log = Arc::new(Mutex::new(Vec::new()));

    let first = h.queue.speak_and_await(logged("first", &log));
    let second = h.queue.speak_and_await(logged("second", &log));
    h.queue.speak(logged("third", &log));

    assert_eq!(until_started(&mut h.events).await, "first");
    assert_eq!(h.queue.backlog_len(), 2);

    h.queue.shut_up();

    assert!(!h.queue.is_speaking());
    assert_eq!(h.queue.backlog_len(), 0);
    assert_eq!(h.renderer.stops.load(Ordering::SeqCst), 1);
    assert_eq!(first.wait().await, Err(SpeechError::Interrupted));
    assert_eq!(second.wait().await, Err(SpeechError::Interrupted));

    assert_eq!(
        next_event(&mut h.events).await,
        SpeechEvent::Cleared { discarded: 2 }
    );

    // Nothing else may start once the queue has been cleared.
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(h.events.try_recv().is_err());
    assert_eq!(*log.lock().unwrap(), vec!["start:first"]);
    assert_eq!(h.renderer.played_texts(), vec!["first"]);
}

#[tokio::test]
async fn shut_up_from_on_start_suppresses_on_end() {
    let h = harness(&config(true), FakeRenderer::auto());
    let log = Arc::new(Mutex::new(Vec::new()));

    let queue = h.queue.clone();
    let end_log = Arc::clone(&log);
    let handle = h.queue.speak_and_await(
        SpeechRequest::new("cut short")
            .on_start(move |_| queue.shut_up())
            .on_end(move |r| end_log.lock().unwrap().push(format!("end:{}", r.text()))),
    );

    assert_eq!(handle.wait().await, Err(SpeechError::Interrupted));
    assert!(!h.queue.is_speaking());
    assert!(log.lock().unwrap().is_empty());
    assert_eq!(h.renderer.played_texts(), vec!["cut short"]);
}

#[tokio::test]
async fn shut_up_cancels_pending_synthesis() {
    let mut h = harness(&config(true), FakeRenderer::auto());
    let log = Arc::new(Mutex::new(Vec::new()));

    let hung = h.queue.speak_and_await(logged("hang forever", &log));
    let queued = h.queue.speak_and_await(logged("behind it", &log));
    while h.backend.calls().is_empty() {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert!(h.queue.is_speaking());

    h.queue.shut_up();

    let hung = tokio::time::timeout(Duration::from_secs(5), hung.wait())
        .await
        .expect("hung request never settled");
    assert_eq!(hung, Err(SpeechError::Interrupted));
    assert_eq!(queued.wait().await, Err(SpeechError::Interrupted));
    assert!(matches!(
        next_event(&mut h.events).await,
        SpeechEvent::Queued { position: 1, .. }
    ));
    assert_eq!(
        next_event(&mut h.events).await,
        SpeechEvent::Cleared { discarded: 1 }
    );

    let next = h.queue.speak_and_await(logged("next", &log));
    assert_eq!(next.wait().await, Ok(()));
    until_idle(&mut h.events).await;

    assert_eq!(h.backend.calls(), vec!["hang forever", "next"]);
    assert_eq!(h.renderer.played_texts(), vec!["next"]);
    assert_eq!(*log.lock().unwrap(), vec!["start:next", "end:next"]);
}

#[tokio::test]
async fn queue_is_usable_after_shut_up() {
    let mut h = harness(&config(true), FakeRenderer::manual());

    h.queue.speak(SpeechRequest::new("interrupted"));
    assert_eq!(until_started(&mut h.events).await, "interrupted");
    h.queue.shut_up();

    let handle = h.queue.speak_and_await(SpeechRequest::new("again"));
    assert!(h.queue.is_speaking());
    assert_eq!(until_started(&mut h.events).await, "again");
    h.renderer.finish_next();

    assert_eq!(handle.wait().await, Ok(()));
    until_idle(&mut h.events).await;
    assert_eq!(h.renderer.played_texts(), vec!["interrupted", "again"]);
}

#[tokio::test]
async fn events_describe_the_lifecycle() {
    let mut h = harness(&config(true), FakeRenderer::auto());

    let a = SpeechRequest::new("a");
    let b = SpeechRequest::new("b");
    let (a_id, b_id) = (a.id(), b.id());
    h.queue.speak(a);
    h.queue.speak(b);

    assert_eq!(
        until_idle(&mut h.events).await,
        vec![
            SpeechEvent::Queued {
                id: b_id,
                position: 1
            },
            SpeechEvent::Started {
                id: a_id,
                text: "a".into()
            },
            SpeechEvent::Finished { id: a_id },
            SpeechEvent::Started {
                id: b_id,
                text: "b".into()
            },
            SpeechEvent::Finished { id: b_id },
            SpeechEvent::Idle,
        ]
    );
}

#[tokio::test]
#[allow(clippy::float_cmp)]
async fn renderer_receives_mapped_parameters() {
    let mut h = harness(&config(true), FakeRenderer::auto());

    h.queue.speak(SpeechRequest::new("neutral"));
    h.queue.speak(SpeechRequest::new("bright").with_pitch(1.5));
    until_idle(&mut h.events).await;

    h.queue.set_volume(0.5).unwrap();
    h.queue.speak(SpeechRequest::new("quiet"));
    until_idle(&mut h.events).await;

    let played = h.renderer.played.lock().unwrap().clone();
    let neutral = played[0].1;
    assert_eq!(neutral.detune, 0.0);
    assert_eq!(neutral.playback_rate, 2.0);
    assert_eq!(neutral.gain, 4.0);

    assert_eq!(played[1].1.detune, 100.0);
    assert_eq!(played[2].1.gain, 2.0);
}

#[tokio::test]
async fn invalid_volume_is_rejected() {
    let h = harness(&config(true), FakeRenderer::auto());
    assert!(h.queue.set_volume(-1.0).is_err());
    assert!(h.queue.set_volume(f64::INFINITY).is_err());
    assert!((h.queue.volume() - 1.0).abs() < f64::EPSILON);
}
