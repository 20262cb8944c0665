//! The orchestrator façade.

use std::time::Duration;

use tracing::{debug, error, info, warn};

use super::events::{Event, EventQueue, EventSender, Navigation};
use super::session::{OrchestratorSession, SessionSummary};
use crate::assets::{AssetCache, AssetFetcher};
use crate::binder::{AnchorContent, ContentBinder};
use crate::config::Settings;
use crate::facing::FacingSmoother;
use crate::host::{absorb, ContentRequest, LoadedContent, Overlay, Stage, StartError};
use crate::models::{AssetMap, CareerId, LoadToken, PlaybackState, TrackingState};
use crate::playback::PlaybackSynchronizer;
use crate::timers::{TimerKind, TimerSet};
use crate::tracking::{FoundDecision, TrackingStateMachine};

/// Owns all session state and reconciles tracking, loading and navigation.
///
/// Every input is an [`Event`] processed strictly in arrival order. Public
/// actions are queued behind events already posted by collaborators and
/// then the queue is drained, so no transition interleaves with another.
pub struct Orchestrator<S: Stage, O: Overlay> {
    stage: S,
    overlay: O,
    assets: AssetCache,
    binder: ContentBinder,
    sync: PlaybackSynchronizer,
    tracking: TrackingStateMachine,
    timers: TimerSet,
    queue: EventQueue,
    session: OrchestratorSession,
    playback: PlaybackState,
    facing: FacingSmoother,
}

impl<S: Stage, O: Overlay> Orchestrator<S, O> {
    pub fn new(stage: S, overlay: O, assets: AssetCache, settings: &Settings) -> Self {
        Self {
            stage,
            overlay,
            assets,
            binder: ContentBinder::new(&settings.layout),
            sync: PlaybackSynchronizer::new(),
            tracking: TrackingStateMachine::new(&settings.timing),
            timers: TimerSet::new(),
            queue: EventQueue::new(),
            session: OrchestratorSession::default(),
            playback: PlaybackState::Idle,
            facing: FacingSmoother::new(settings.layout.facing_rate as f32),
        }
    }

    // ------------------------------------------------------------------
    // Public actions
    // ------------------------------------------------------------------

    /// Resolve every career's assets once. See [`AssetCache::preload`].
    pub async fn preload<F: AssetFetcher>(
        &mut self,
        fetcher: &F,
        on_progress: impl FnMut(u32),
    ) -> AssetMap {
        self.assets.preload(fetcher, on_progress).await
    }

    /// Start tracking, publish career availability and show scan guidance.
    ///
    /// A refused camera is fatal: the error is shown on the overlay and the
    /// session does not start.
    pub fn init_and_start(&mut self) -> Result<(), StartError> {
        if let Err(e) = self.stage.start_tracking() {
            error!("Session start failed: {}", e);
            self.overlay.show_error(e.user_message());
            return Err(e);
        }

        for career in self.assets.careers() {
            let ready = self
                .assets
                .entry(career.id.as_str())
                .is_some_and(|entry| entry.is_ready());
            self.overlay.set_career_enabled(&career.id, ready);
        }

        self.session.scan.show(&mut self.overlay);
        info!("Session started with {} careers", self.assets.careers().len());
        Ok(())
    }

    pub fn select_career(&mut self, career: impl Into<CareerId>) {
        self.dispatch(Navigation::SelectCareer(career.into()));
    }

    pub fn pause_to_menu(&mut self) {
        self.dispatch(Navigation::PauseToMenu);
    }

    pub fn return_to_last(&mut self) {
        self.dispatch(Navigation::ReturnToLast);
    }

    pub fn remove_and_show_menu(&mut self) {
        self.dispatch(Navigation::RemoveAndShowMenu);
    }

    pub fn reset_to_idle(&mut self) {
        self.dispatch(Navigation::ResetToIdle);
    }

    pub fn set_autoplay_enabled(&mut self, enabled: bool) {
        self.dispatch(Navigation::SetAutoplay(enabled));
    }

    pub fn set_scan_ui_suppressed(&mut self, suppressed: bool) {
        self.dispatch(Navigation::SetScanUiSuppressed(suppressed));
    }

    /// Per-frame hook.
    ///
    /// Drains the queue, moves the frame clock, fires due timers in
    /// deadline order, advances the animation timeline and turns the model
    /// toward the camera.
    pub fn advance(&mut self, delta: Duration) {
        self.pump();

        self.timers.advance_clock(delta);
        while let Some(kind) = self.timers.pop_due() {
            self.on_timer(kind);
            self.pump();
        }

        let dt = delta.as_secs_f32();
        self.advance_animation(dt);
        self.update_facing(dt);
    }

    /// Process every queued event. Returns how many were handled.
    pub fn pump(&mut self) -> usize {
        let mut handled = 0;
        while let Some(event) = self.queue.pop() {
            self.handle(event);
            handled += 1;
        }
        handled
    }

    /// Handle for collaborators to post events.
    pub fn event_sender(&self) -> EventSender {
        self.queue.sender()
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// The cached asset map, once preloaded.
    pub fn asset_map(&self) -> Option<&AssetMap> {
        self.assets.assets()
    }

    pub fn assets(&self) -> &AssetCache {
        &self.assets
    }

    pub fn stage(&self) -> &S {
        &self.stage
    }

    pub fn stage_mut(&mut self) -> &mut S {
        &mut self.stage
    }

    pub fn overlay(&self) -> &O {
        &self.overlay
    }

    pub fn binder(&self) -> &ContentBinder {
        &self.binder
    }

    pub fn session(&self) -> &OrchestratorSession {
        &self.session
    }

    pub fn playback_state(&self) -> PlaybackState {
        self.playback
    }

    pub fn tracking_state(&self) -> TrackingState {
        self.tracking.state()
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            tracking: self.tracking.state(),
            playback: self.playback,
            current_career: self.session.current_career.clone(),
            last_career: self.session.last_career.clone(),
            bound_career: self.binder.current().map(|c| c.career().clone()),
            autoplay_enabled: self.session.autoplay_enabled(),
            scan_ui_suppressed: self.session.scan_ui_suppressed(),
            scan_ui_visible: self.session.scan_ui_visible(),
            load_token: self.session.token,
            clock_ms: self.timers.now().as_millis() as u64,
            tracking_transitions: self.tracking.transitions(),
            binder: self.binder.stats(),
            playback_stats: self.sync.stats(),
        }
    }

    // ------------------------------------------------------------------
    // Event handling
    // ------------------------------------------------------------------

    fn dispatch(&mut self, navigation: Navigation) {
        self.queue.push(Event::Navigation(navigation));
        self.pump();
    }

    fn handle(&mut self, event: Event) {
        debug!("Handling {}", event);
        match event {
            Event::TargetFound => self.on_target_found(),
            Event::TargetLost => self.on_target_lost(),
            Event::ContentLoaded(loaded) => self.on_content_loaded(loaded),
            Event::ContentFailed {
                token,
                career,
                reason,
            } => self.on_content_failed(token, career, &reason),
            Event::VideoMetadata {
                token,
                width,
                height,
            } => self.on_video_metadata(token, width, height),
            Event::Navigation(navigation) => self.on_navigation(navigation),
        }
    }

    fn on_navigation(&mut self, navigation: Navigation) {
        match navigation {
            Navigation::SelectCareer(career) => self.on_select_career(career),
            Navigation::PauseToMenu => self.on_pause_to_menu(),
            Navigation::ReturnToLast => self.on_return_to_last(),
            Navigation::RemoveAndShowMenu => self.clear_content(false),
            Navigation::ResetToIdle => self.clear_content(true),
            Navigation::SetAutoplay(enabled) => self.on_set_autoplay(enabled),
            Navigation::SetScanUiSuppressed(suppressed) => self.apply_scan_suppressed(suppressed),
        }
    }

    fn on_target_found(&mut self) {
        if !self
            .tracking
            .found(&mut self.overlay, &mut self.timers, &mut self.session.scan)
        {
            return;
        }

        self.binder.reveal(&mut self.stage);

        match self
            .tracking
            .decide_found(&self.session.gate, self.playback, self.binder.is_bound())
        {
            FoundDecision::Hold => {}
            FoundDecision::ResumeNow => self.resume_playback(),
            FoundDecision::ScheduleStart => self.tracking.schedule_start(&mut self.timers),
        }
    }

    fn on_target_lost(&mut self) {
        let playing = self.playback == PlaybackState::Playing
            || self.binder.current().is_some_and(AnchorContent::is_playing);

        if !self
            .tracking
            .lost(&mut self.overlay, &mut self.timers, &mut self.session.scan)
        {
            return;
        }

        if self
            .tracking
            .should_freeze_on_lost(&self.session.gate, playing)
        {
            if let Some(content) = self.binder.current_mut() {
                self.sync.freeze(&mut self.stage, content);
            }
            self.playback = PlaybackState::PausedByTrackingLoss;
            info!("Playback paused by tracking loss");
        }
    }

    fn on_select_career(&mut self, career: CareerId) {
        if self.assets.career(career.as_str()).is_none() {
            warn!("Unknown career '{}'; ignoring selection", career);
            return;
        }

        let token = self.session.bump_token();
        self.timers.cancel(TimerKind::SettleStart);

        let same_bound = self
            .binder
            .current()
            .is_some_and(|content| content.career() == &career);
        // Same career stays bound (frozen) until its reload replaces it
        self.binder.release(&mut self.stage, &mut self.sync, same_bound);

        info!("Selecting career {} (load {})", career, token);
        self.session.current_career = Some(career.clone());
        self.enter_ar_view();

        let entry = self
            .assets
            .entry(career.as_str())
            .cloned()
            .unwrap_or_default();

        if entry.is_empty() {
            warn!("No content resolved for {}; nothing to bind", career);
            self.binder.release(&mut self.stage, &mut self.sync, false);
            self.playback = PlaybackState::WaitingForMarker;
            return;
        }

        self.playback = PlaybackState::Loading;
        let request = ContentRequest {
            token,
            career,
            entry,
        };
        if absorb("request_content", self.stage.request_content(request)).is_none() {
            self.binder.release(&mut self.stage, &mut self.sync, false);
            self.playback = PlaybackState::WaitingForMarker;
        }
    }

    fn on_content_loaded(&mut self, loaded: LoadedContent) {
        if loaded.token != self.session.token {
            debug!(
                "Load {} for {} superseded by {}; discarding",
                loaded.token, loaded.career, self.session.token
            );
            self.binder.discard(&mut self.stage, loaded);
            return;
        }

        let career = loaded.career.clone();
        let entry = self
            .assets
            .entry(career.as_str())
            .cloned()
            .unwrap_or_default();

        self.binder.bind(&mut self.stage, &entry, loaded);
        self.facing.reset();

        if !self.binder.is_bound() {
            self.playback = PlaybackState::WaitingForMarker;
            return;
        }
        self.session.last_career = Some(career);

        if !self.session.gate.is_enabled() {
            self.playback = PlaybackState::PausedByBack;
            return;
        }

        self.playback = PlaybackState::WaitingForMarker;
        if self.tracking.is_found() {
            self.binder.reveal(&mut self.stage);
            self.tracking.schedule_start(&mut self.timers);
        }
    }

    fn on_content_failed(&mut self, token: LoadToken, career: CareerId, reason: &str) {
        if token != self.session.token {
            debug!("Ignoring failure of superseded load {} for {}", token, career);
            return;
        }
        warn!("Content for {} failed to load: {}", career, reason);
        self.binder.release(&mut self.stage, &mut self.sync, false);
        self.playback = PlaybackState::WaitingForMarker;
    }

    fn on_video_metadata(&mut self, token: LoadToken, width: u32, height: u32) {
        let current = self.binder.current().map(AnchorContent::token);
        if current != Some(token) {
            debug!("Ignoring video metadata for load {}", token);
            return;
        }
        self.binder.apply_video_metadata(&mut self.stage, width, height);
    }

    fn on_pause_to_menu(&mut self) {
        self.timers.cancel(TimerKind::SettleStart);
        self.binder.release(&mut self.stage, &mut self.sync, true);
        self.session.gate.close();
        self.apply_scan_suppressed(true);

        if self.binder.is_bound() {
            self.playback = PlaybackState::PausedByBack;
        }
        info!("Paused to menu ({})", self.playback);
    }

    fn on_return_to_last(&mut self) {
        let Some(last) = self.session.last_career.clone() else {
            info!("No career to return to");
            return;
        };

        let resumable = self.playback == PlaybackState::PausedByBack
            && self
                .binder
                .current()
                .is_some_and(|content| content.career() == &last);

        if !resumable {
            self.on_select_career(last);
            return;
        }

        info!("Returning to {}", last);
        self.session.current_career = Some(last);
        self.enter_ar_view();

        // Either way playback continues from where the menu froze it
        if self.tracking.is_found() {
            self.binder.reveal(&mut self.stage);
            self.resume_playback();
        } else {
            self.playback = PlaybackState::PausedByTrackingLoss;
        }
    }

    /// Release everything; `forget_last` also clears the last career.
    fn clear_content(&mut self, forget_last: bool) {
        self.session.bump_token();
        self.timers.cancel(TimerKind::SettleStart);
        self.binder.release(&mut self.stage, &mut self.sync, false);
        self.session.gate.close();
        self.apply_scan_suppressed(true);
        self.session.current_career = None;
        if forget_last {
            self.session.last_career = None;
        }
        self.facing.reset();
        self.playback = PlaybackState::Idle;
        info!(
            "Content cleared ({})",
            if forget_last { "reset to idle" } else { "menu" }
        );
    }

    fn on_set_autoplay(&mut self, enabled: bool) {
        self.session.gate.set(enabled);

        if !enabled {
            self.timers.cancel(TimerKind::SettleStart);
            if self.playback == PlaybackState::Playing {
                if let Some(content) = self.binder.current_mut() {
                    self.sync.freeze(&mut self.stage, content);
                }
                self.playback = PlaybackState::PausedByBack;
            }
            return;
        }

        if !self.tracking.is_found() {
            return;
        }
        match self
            .tracking
            .decide_found(&self.session.gate, self.playback, self.binder.is_bound())
        {
            FoundDecision::Hold => {}
            FoundDecision::ResumeNow => self.resume_playback(),
            FoundDecision::ScheduleStart => self.tracking.schedule_start(&mut self.timers),
        }
    }

    fn apply_scan_suppressed(&mut self, suppressed: bool) {
        self.session.scan.set_suppressed(suppressed);
        if suppressed {
            self.timers.cancel(TimerKind::ScanFade);
            self.session.scan.hide(&mut self.overlay);
        } else if !self.tracking.is_found() && !self.session.scan.is_visible() {
            self.session.scan.show(&mut self.overlay);
        }
    }

    /// Back to the AR view: autoplay allowed, scan guidance unsuppressed.
    fn enter_ar_view(&mut self) {
        self.session.gate.open();
        self.apply_scan_suppressed(false);
    }

    // ------------------------------------------------------------------
    // Timers and per-frame work
    // ------------------------------------------------------------------

    fn on_timer(&mut self, kind: TimerKind) {
        debug!("Timer {} fired", kind);
        match kind {
            TimerKind::ScanFade => self.session.scan.finish_fade(&mut self.overlay),
            TimerKind::SettleStart => self.on_settle_elapsed(),
        }
    }

    fn on_settle_elapsed(&mut self) {
        let ready = self.session.gate.is_enabled()
            && self.tracking.is_found()
            && self.binder.is_bound()
            && self.playback == PlaybackState::WaitingForMarker;
        if !ready {
            debug!("Settle start no longer applicable ({})", self.playback);
            return;
        }
        self.start_playback();
    }

    fn start_playback(&mut self) {
        let Some(content) = self.binder.current_mut() else {
            return;
        };
        if self.sync.start(&mut self.stage, content) {
            info!("Playing {}", content.career());
            self.playback = PlaybackState::Playing;
        } else {
            self.playback = PlaybackState::WaitingForMarker;
        }
    }

    fn resume_playback(&mut self) {
        let Some(content) = self.binder.current_mut() else {
            return;
        };
        if self.sync.resume(&mut self.stage, content) {
            info!("Resumed {}", content.career());
            self.playback = PlaybackState::Playing;
        } else {
            self.playback = PlaybackState::WaitingForMarker;
        }
    }

    fn advance_animation(&mut self, dt: f32) {
        let Some(timeline) = self
            .binder
            .current_mut()
            .and_then(AnchorContent::timeline_mut)
        else {
            return;
        };
        if timeline.advance(dt) {
            absorb(
                "set_animation_time",
                self.stage.set_animation_time(timeline.clip(), timeline.time()),
            );
        }
    }

    fn update_facing(&mut self, dt: f32) {
        if !self.tracking.is_found() {
            return;
        }
        let Some(root) = self.binder.current().and_then(AnchorContent::model_root) else {
            return;
        };
        let Some(offset) = absorb("camera_offset", self.stage.camera_offset()) else {
            return;
        };
        if let Some(rotation) = self.facing.step(offset, dt) {
            absorb("set_rotation", self.stage.set_rotation(root, rotation));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_SETTLE_DELAY_MS;
    use crate::host::VideoId;
    use crate::models::{AssetEntry, Career};
    use crate::testing::{entry_with, FakeOverlay, FakeStage};

    const FRAME: Duration = Duration::from_millis(16);

    type Kiosk = Orchestrator<FakeStage, FakeOverlay>;

    fn roster() -> Vec<Career> {
        ["Cloud", "Network", "Data", "Security"]
            .into_iter()
            .map(|id| Career::new(id, ""))
            .collect()
    }

    fn kiosk_with(stage: FakeStage) -> Kiosk {
        crate::logging::init_test_tracing();
        let mut assets = AssetMap::new();
        // Cloud has no resolvable video
        assets.insert(CareerId::new("Cloud"), entry_with(true, false, Some(2.0)));
        assets.insert(CareerId::new("Network"), entry_with(true, true, Some(4.0)));
        assets.insert(CareerId::new("Data"), entry_with(true, true, None));
        assets.insert(CareerId::new("Security"), AssetEntry::default());

        let cache = AssetCache::preloaded(roster(), assets);
        Orchestrator::new(stage, FakeOverlay::new(), cache, &Settings::default())
    }

    fn kiosk() -> Kiosk {
        let mut kiosk = kiosk_with(FakeStage::new());
        kiosk.init_and_start().unwrap();
        kiosk
    }

    /// Complete the newest content request, as the stage would.
    fn complete_latest(kiosk: &mut Kiosk) {
        let request = kiosk.stage().requests.last().cloned().unwrap();
        complete(kiosk, request);
    }

    fn complete(kiosk: &mut Kiosk, request: ContentRequest) {
        let loaded = kiosk.stage_mut().instantiate(&request);
        kiosk.event_sender().content_loaded(loaded);
        kiosk.pump();
    }

    fn found(kiosk: &mut Kiosk) {
        kiosk.event_sender().target_found();
        kiosk.pump();
    }

    fn lost(kiosk: &mut Kiosk) {
        kiosk.event_sender().target_lost();
        kiosk.pump();
    }

    fn run_for(kiosk: &mut Kiosk, total: Duration) {
        let mut elapsed = Duration::ZERO;
        while elapsed < total {
            kiosk.advance(FRAME);
            elapsed += FRAME;
        }
    }

    fn bound_video(kiosk: &Kiosk) -> VideoId {
        kiosk.binder().current().unwrap().video_element().unwrap()
    }

    /// Playing implies tracking found and autoplay enabled.
    fn assert_consistent(kiosk: &Kiosk) {
        if kiosk.playback_state() == PlaybackState::Playing {
            assert_eq!(kiosk.tracking_state(), TrackingState::Found);
            assert!(kiosk.session().autoplay_enabled());
        }
        assert!(kiosk.stage().attached_count() <= 2);
        assert_eq!(kiosk.stage().double_disposals, 0);
    }

    fn playing_network() -> Kiosk {
        let mut kiosk = kiosk();
        kiosk.select_career("Network");
        complete_latest(&mut kiosk);
        found(&mut kiosk);
        run_for(&mut kiosk, Duration::from_millis(DEFAULT_SETTLE_DELAY_MS + 100));
        assert_eq!(kiosk.playback_state(), PlaybackState::Playing);
        kiosk
    }

    #[test]
    fn start_publishes_availability_and_scan_guidance() {
        let kiosk = kiosk();
        let overlay = kiosk.overlay();

        assert!(overlay.enabled[&CareerId::new("Network")]);
        assert!(overlay.enabled[&CareerId::new("Data")]);
        assert!(!overlay.enabled[&CareerId::new("Cloud")]);
        assert!(!overlay.enabled[&CareerId::new("Security")]);
        assert!(overlay.scan_shown);
        assert_eq!(kiosk.playback_state(), PlaybackState::Idle);
    }

    #[test]
    fn camera_refusal_blocks_start_with_message() {
        let mut stage = FakeStage::new();
        stage.deny_camera = true;
        let mut kiosk = kiosk_with(stage);

        let err = kiosk.init_and_start().unwrap_err();
        assert!(matches!(err, StartError::PermissionDenied(_)));
        assert_eq!(kiosk.overlay().errors.len(), 1);
        assert!(kiosk.overlay().enabled.is_empty());
    }

    #[test]
    fn sequential_selections_dispose_all_but_last() {
        let mut kiosk = kiosk();
        for career in ["Network", "Data", "Cloud", "Network"] {
            kiosk.select_career(career);
            complete_latest(&mut kiosk);
            assert_consistent(&kiosk);
        }

        let stats = kiosk.binder().stats();
        assert_eq!(stats.contents_bound, 4);
        assert_eq!(stats.contents_disposed, 3);
        assert_eq!(kiosk.stage().attached_count(), 2);
        assert_eq!(
            kiosk.binder().current().unwrap().career(),
            &CareerId::new("Network")
        );
        assert_eq!(stats.handles_live, 4);
    }

    #[test]
    fn fresh_bind_waits_settle_delay() {
        let mut kiosk = kiosk();
        kiosk.select_career("Network");
        complete_latest(&mut kiosk);
        found(&mut kiosk);
        assert_eq!(kiosk.playback_state(), PlaybackState::WaitingForMarker);
        assert!(kiosk.binder().current().unwrap().is_visible());

        kiosk.advance(Duration::from_millis(DEFAULT_SETTLE_DELAY_MS - 1));
        assert_eq!(kiosk.playback_state(), PlaybackState::WaitingForMarker);
        assert!(!kiosk.stage().any_playing());

        kiosk.advance(Duration::from_millis(1));
        assert_eq!(kiosk.playback_state(), PlaybackState::Playing);
        assert!(kiosk.stage().is_playing(bound_video(&kiosk)));
    }

    #[test]
    fn found_before_load_starts_after_settle() {
        let mut kiosk = kiosk();
        kiosk.select_career("Network");
        found(&mut kiosk);
        assert_eq!(kiosk.playback_state(), PlaybackState::Loading);

        complete_latest(&mut kiosk);
        assert!(kiosk.binder().current().unwrap().is_visible());
        run_for(&mut kiosk, Duration::from_millis(DEFAULT_SETTLE_DELAY_MS));
        assert_eq!(kiosk.playback_state(), PlaybackState::Playing);
    }

    #[test]
    fn tracking_loss_pause_resumes_without_delay() {
        let mut kiosk = playing_network();
        run_for(&mut kiosk, Duration::from_millis(500));
        let before = kiosk.binder().current().unwrap().timeline().unwrap().time();

        lost(&mut kiosk);
        assert_eq!(kiosk.playback_state(), PlaybackState::PausedByTrackingLoss);
        assert!(!kiosk.stage().is_playing(bound_video(&kiosk)));
        run_for(&mut kiosk, Duration::from_secs(1));
        let frozen = kiosk.binder().current().unwrap().timeline().unwrap().time();
        assert_eq!(frozen, before);

        found(&mut kiosk);
        assert_eq!(kiosk.playback_state(), PlaybackState::Playing);
        assert!(kiosk.stage().is_playing(bound_video(&kiosk)));
        // Resumed where it stopped
        let resumed = kiosk.binder().current().unwrap().timeline().unwrap().time();
        assert_eq!(resumed, before);
        assert_consistent(&kiosk);
    }

    #[test]
    fn disabled_autoplay_never_plays_on_found() {
        let mut kiosk = kiosk();
        kiosk.select_career("Network");
        complete_latest(&mut kiosk);
        kiosk.set_autoplay_enabled(false);

        for _ in 0..3 {
            found(&mut kiosk);
            run_for(&mut kiosk, Duration::from_secs(2));
            lost(&mut kiosk);
        }
        found(&mut kiosk);
        run_for(&mut kiosk, Duration::from_secs(2));

        assert!(!kiosk.stage().any_playing());
        assert_ne!(kiosk.playback_state(), PlaybackState::Playing);
        assert_eq!(kiosk.summary().playback_stats.starts, 0);
    }

    #[test]
    fn disabling_autoplay_while_playing_freezes() {
        let mut kiosk = playing_network();
        kiosk.set_autoplay_enabled(false);

        assert_eq!(kiosk.playback_state(), PlaybackState::PausedByBack);
        assert!(!kiosk.binder().current().unwrap().is_playing());
        assert_consistent(&kiosk);
    }

    #[test]
    fn reset_to_idle_clears_everything() {
        let mut kiosk = playing_network();
        kiosk.reset_to_idle();

        let session = kiosk.session();
        assert!(!kiosk.binder().is_bound());
        assert!(!session.autoplay_enabled());
        assert!(session.scan_ui_suppressed());
        assert!(session.last_career().is_none());
        assert!(session.current_career().is_none());
        assert_eq!(kiosk.playback_state(), PlaybackState::Idle);
        assert_eq!(kiosk.stage().attached_count(), 0);
        assert_eq!(kiosk.binder().stats().handles_live, 0);
    }

    #[test]
    fn career_without_video_binds_model_alone() {
        let mut kiosk = kiosk();
        assert!(kiosk.asset_map().unwrap()["Cloud"].video.is_none());
        assert!(!kiosk.overlay().enabled[&CareerId::new("Cloud")]);

        kiosk.select_career("Cloud");
        complete_latest(&mut kiosk);

        let content = kiosk.binder().current().unwrap();
        assert!(content.model().is_some());
        assert!(content.video().is_none());
        assert_eq!(kiosk.stage().attached_count(), 1);

        found(&mut kiosk);
        run_for(&mut kiosk, Duration::from_secs(1));
        assert_eq!(kiosk.playback_state(), PlaybackState::Playing);

        // Model-only content still pauses on tracking loss
        lost(&mut kiosk);
        assert_eq!(kiosk.playback_state(), PlaybackState::PausedByTrackingLoss);
        assert!(!kiosk.binder().current().unwrap().is_playing());
    }

    #[test]
    fn stale_load_is_discarded_and_disposed() {
        let mut kiosk = kiosk();
        kiosk.select_career("Cloud");
        kiosk.select_career("Network");
        let requests = kiosk.stage().requests.clone();
        assert_eq!(requests.len(), 2);

        let stale = kiosk.stage_mut().instantiate(&requests[0]);
        let stale_resources: Vec<_> = stale.resources().collect();
        kiosk.event_sender().content_loaded(stale);
        kiosk.pump();

        assert!(!kiosk.binder().is_bound());
        assert!(stale_resources.iter().all(|r| kiosk.stage().is_disposed(*r)));
        assert_eq!(kiosk.binder().stats().loads_discarded, 1);

        complete(&mut kiosk, requests[1].clone());
        assert_eq!(
            kiosk.binder().current().unwrap().career(),
            &CareerId::new("Network")
        );
        assert_eq!(kiosk.binder().stats().contents_bound, 1);
        assert_eq!(kiosk.stage().attached_count(), 2);
    }

    #[test]
    fn found_while_paused_by_back_waits_for_return() {
        let mut kiosk = playing_network();
        kiosk.pause_to_menu();
        assert_eq!(kiosk.playback_state(), PlaybackState::PausedByBack);
        assert!(kiosk.session().scan_ui_suppressed());
        assert!(kiosk.binder().is_bound());

        lost(&mut kiosk);
        found(&mut kiosk);
        run_for(&mut kiosk, Duration::from_secs(2));
        assert_eq!(kiosk.playback_state(), PlaybackState::PausedByBack);
        assert!(!kiosk.stage().any_playing());

        let requests = kiosk.stage().requests.len();
        kiosk.return_to_last();
        assert_eq!(kiosk.playback_state(), PlaybackState::Playing);
        // Resumed without reloading
        assert_eq!(kiosk.stage().requests.len(), requests);
        assert!(kiosk.session().autoplay_enabled());
        assert_consistent(&kiosk);
    }

    fn timeline_time(kiosk: &Kiosk) -> f32 {
        kiosk.binder().current().unwrap().timeline().unwrap().time()
    }

    #[test]
    fn return_to_last_while_found_continues_position() {
        let mut kiosk = playing_network();
        run_for(&mut kiosk, Duration::from_secs(1));
        kiosk.pause_to_menu();
        let paused = timeline_time(&kiosk);
        assert!(paused > 0.5);

        kiosk.return_to_last();
        assert_eq!(kiosk.playback_state(), PlaybackState::Playing);
        assert_eq!(timeline_time(&kiosk), paused);

        let stats = kiosk.summary().playback_stats;
        assert_eq!(stats.starts, 1);
        assert_eq!(stats.resumes, 1);
    }

    #[test]
    fn return_to_last_while_lost_resumes_on_found() {
        let mut kiosk = playing_network();
        run_for(&mut kiosk, Duration::from_secs(1));
        kiosk.pause_to_menu();
        let paused = timeline_time(&kiosk);
        lost(&mut kiosk);

        kiosk.return_to_last();
        assert_eq!(kiosk.playback_state(), PlaybackState::PausedByTrackingLoss);
        assert!(kiosk.overlay().scan_shown);
        assert!(!kiosk.stage().any_playing());

        // No settle delay and no rewind
        found(&mut kiosk);
        assert_eq!(kiosk.playback_state(), PlaybackState::Playing);
        assert!(kiosk.stage().is_playing(bound_video(&kiosk)));
        assert_eq!(timeline_time(&kiosk), paused);

        kiosk.advance(FRAME);
        assert!(timeline_time(&kiosk) > paused);

        let stats = kiosk.summary().playback_stats;
        assert_eq!(stats.starts, 1);
        assert_eq!(stats.resumes, 1);
        assert_consistent(&kiosk);
    }

    #[test]
    fn relock_restarts_settle_delay() {
        let mut kiosk = kiosk();
        kiosk.select_career("Network");
        complete_latest(&mut kiosk);

        found(&mut kiosk);
        kiosk.advance(Duration::from_millis(DEFAULT_SETTLE_DELAY_MS / 2));
        lost(&mut kiosk);
        assert_eq!(kiosk.playback_state(), PlaybackState::WaitingForMarker);

        kiosk.advance(Duration::from_millis(DEFAULT_SETTLE_DELAY_MS / 4));
        found(&mut kiosk);

        // Past the first lock's deadline
        kiosk.advance(Duration::from_millis(DEFAULT_SETTLE_DELAY_MS / 2));
        assert_eq!(kiosk.playback_state(), PlaybackState::WaitingForMarker);
        assert_eq!(kiosk.summary().playback_stats.starts, 0);
        assert!(!kiosk.stage().any_playing());

        // One full settle delay after the second lock
        kiosk.advance(Duration::from_millis(DEFAULT_SETTLE_DELAY_MS / 2 - 1));
        assert_eq!(kiosk.playback_state(), PlaybackState::WaitingForMarker);
        assert_eq!(kiosk.summary().playback_stats.starts, 0);

        kiosk.advance(Duration::from_millis(1));
        assert_eq!(kiosk.playback_state(), PlaybackState::Playing);
        assert_eq!(kiosk.summary().playback_stats.starts, 1);
        assert!(kiosk.stage().is_playing(bound_video(&kiosk)));
    }

    #[test]
    fn return_after_removal_reloads_last_career() {
        let mut kiosk = playing_network();
        kiosk.remove_and_show_menu();
        assert_eq!(kiosk.playback_state(), PlaybackState::Idle);
        assert_eq!(kiosk.session().last_career(), Some(&CareerId::new("Network")));

        let requests = kiosk.stage().requests.len();
        kiosk.return_to_last();
        assert_eq!(kiosk.stage().requests.len(), requests + 1);
        assert_eq!(kiosk.playback_state(), PlaybackState::Loading);
    }

    #[test]
    fn return_without_history_is_a_no_op() {
        let mut kiosk = kiosk();
        kiosk.return_to_last();
        assert_eq!(kiosk.playback_state(), PlaybackState::Idle);
        assert!(kiosk.stage().requests.is_empty());
    }

    #[test]
    fn removal_invalidates_in_flight_load() {
        let mut kiosk = kiosk();
        kiosk.select_career("Data");
        kiosk.remove_and_show_menu();
        complete_latest(&mut kiosk);

        assert!(!kiosk.binder().is_bound());
        assert_eq!(kiosk.binder().stats().loads_discarded, 1);
        assert_eq!(kiosk.playback_state(), PlaybackState::Idle);
    }

    #[test]
    fn unknown_career_is_rejected() {
        let mut kiosk = playing_network();
        let token = kiosk.session().token();
        kiosk.select_career("Astronaut");

        assert_eq!(kiosk.session().token(), token);
        assert_eq!(kiosk.playback_state(), PlaybackState::Playing);
        assert_eq!(
            kiosk.session().current_career(),
            Some(&CareerId::new("Network"))
        );
    }

    #[test]
    fn empty_entry_binds_nothing() {
        let mut kiosk = playing_network();
        kiosk.select_career("Security");

        assert!(!kiosk.binder().is_bound());
        assert_eq!(kiosk.playback_state(), PlaybackState::WaitingForMarker);
        assert_eq!(kiosk.stage().attached_count(), 0);
    }

    #[test]
    fn load_completing_behind_menu_is_paused_by_back() {
        let mut kiosk = kiosk();
        kiosk.select_career("Network");
        found(&mut kiosk);
        kiosk.pause_to_menu();
        complete_latest(&mut kiosk);

        assert_eq!(kiosk.playback_state(), PlaybackState::PausedByBack);
        run_for(&mut kiosk, Duration::from_secs(2));
        assert!(!kiosk.stage().any_playing());
    }

    #[test]
    fn request_fault_leaves_waiting() {
        let mut stage = FakeStage::new();
        stage.fail_requests = true;
        let mut kiosk = kiosk_with(stage);
        kiosk.init_and_start().unwrap();

        kiosk.select_career("Network");
        assert_eq!(kiosk.playback_state(), PlaybackState::WaitingForMarker);
        assert!(!kiosk.binder().is_bound());
    }

    #[test]
    fn content_failure_for_current_load_leaves_waiting() {
        let mut kiosk = kiosk();
        kiosk.select_career("Network");
        let token = kiosk.session().token();
        kiosk
            .event_sender()
            .content_failed(token, CareerId::new("Network"), "decoder crashed");
        kiosk.pump();
        assert_eq!(kiosk.playback_state(), PlaybackState::WaitingForMarker);
    }

    #[test]
    fn refused_play_keeps_content_paused() {
        let mut kiosk = kiosk();
        kiosk.stage_mut().refuse_play = true;
        kiosk.select_career("Network");
        complete_latest(&mut kiosk);
        found(&mut kiosk);
        run_for(&mut kiosk, Duration::from_secs(1));

        assert_eq!(kiosk.playback_state(), PlaybackState::WaitingForMarker);
        let content = kiosk.binder().current().unwrap();
        assert!(!content.is_playing());
        assert_eq!(kiosk.summary().playback_stats.refused_plays, 1);
    }

    #[test]
    fn video_metadata_lays_out_once_for_current_load() {
        let mut kiosk = kiosk();
        kiosk.select_career("Network");
        let stale_token = kiosk.session().token();
        kiosk.select_career("Data");
        complete_latest(&mut kiosk);

        let sender = kiosk.event_sender();
        sender.video_metadata(stale_token, 1920, 1080);
        kiosk.pump();
        assert!(!kiosk.binder().current().unwrap().layout_applied());

        sender.video_metadata(kiosk.session().token(), 1920, 1080);
        kiosk.pump();
        let content = kiosk.binder().current().unwrap();
        assert!(content.layout_applied());
        let surface = content.video_surface().unwrap();
        assert!((kiosk.stage().scale(surface).unwrap().y - 0.5625).abs() < 1e-6);
    }

    #[test]
    fn scan_guidance_choreography() {
        let mut kiosk = kiosk();
        kiosk.select_career("Network");
        assert!(kiosk.session().scan_ui_visible());

        found(&mut kiosk);
        assert!(kiosk.session().scan_ui_visible());
        run_for(&mut kiosk, Duration::from_millis(320));
        assert!(!kiosk.session().scan_ui_visible());
        assert!(!kiosk.overlay().scan_shown);

        lost(&mut kiosk);
        assert!(!kiosk.overlay().scan_shown);

        kiosk.set_scan_ui_suppressed(true);
        kiosk.set_scan_ui_suppressed(false);
        assert!(kiosk.overlay().scan_shown);
    }

    #[test]
    fn suppressing_scan_ui_cancels_fade() {
        let mut kiosk = kiosk();
        found(&mut kiosk);
        kiosk.set_scan_ui_suppressed(true);
        assert!(!kiosk.overlay().scan_shown);

        let hides = |k: &Kiosk| k.overlay().calls.iter().filter(|c| *c == "hide_scan").count();
        let before = hides(&kiosk);
        run_for(&mut kiosk, Duration::from_millis(500));
        assert_eq!(hides(&kiosk), before);
    }

    #[test]
    fn queued_events_are_processed_before_actions() {
        let mut kiosk = kiosk();
        kiosk.event_sender().target_found();
        kiosk.select_career("Network");

        assert_eq!(kiosk.tracking_state(), TrackingState::Found);
        // Found came first, so guidance is fading rather than re-shown
        let calls = &kiosk.overlay().calls;
        assert_eq!(calls.last().map(String::as_str), Some("fade_scan 300ms"));
    }

    #[test]
    fn model_turns_toward_camera_while_tracked() {
        let mut kiosk = playing_network();
        kiosk.stage_mut().camera = Some(glam::Vec3::new(2.0, 0.5, 0.0));
        run_for(&mut kiosk, Duration::from_secs(1));

        let root = kiosk.binder().current().unwrap().model_root().unwrap();
        let rotation = kiosk.stage().rotation(root).unwrap();
        let facing = rotation * glam::Vec3::Z;
        assert!(facing.x > 0.9, "facing = {facing:?}");
    }

    #[test]
    fn animation_time_is_pushed_to_stage() {
        let mut kiosk = playing_network();
        run_for(&mut kiosk, Duration::from_millis(480));

        let content = kiosk.binder().current().unwrap();
        let clip = content.model().unwrap().clip.unwrap();
        let time = kiosk.stage().animation_time(clip).unwrap();
        assert!(time > 0.0);
        assert_eq!(time, content.timeline().unwrap().time());
    }

    #[test]
    fn summary_serializes_to_json() {
        let kiosk = playing_network();
        let json = serde_json::to_value(kiosk.summary()).unwrap();
        assert_eq!(json["playback"], "Playing");
        assert_eq!(json["bound_career"], "Network");
        assert_eq!(json["binder"]["contents_bound"], 1);
    }

    #[test]
    fn mixed_session_never_leaks_or_plays_hidden_content() {
        let mut kiosk = kiosk();
        kiosk.select_career("Cloud");
        assert_consistent(&kiosk);
        found(&mut kiosk);
        kiosk.select_career("Network");
        complete_latest(&mut kiosk);
        assert_consistent(&kiosk);
        run_for(&mut kiosk, Duration::from_secs(1));
        assert_consistent(&kiosk);
        lost(&mut kiosk);
        assert_consistent(&kiosk);
        kiosk.pause_to_menu();
        found(&mut kiosk);
        assert_consistent(&kiosk);
        kiosk.select_career("Data");
        run_for(&mut kiosk, Duration::from_millis(100));
        complete_latest(&mut kiosk);
        run_for(&mut kiosk, Duration::from_secs(1));
        assert_consistent(&kiosk);
        kiosk.remove_and_show_menu();
        assert_consistent(&kiosk);
        assert_eq!(kiosk.stage().attached_count(), 0);

        let stats = kiosk.binder().stats();
        assert_eq!(stats.handles_live, 0);
        assert_eq!(stats.contents_bound, stats.contents_disposed);
    }
}
