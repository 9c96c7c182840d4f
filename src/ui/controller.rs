//! UI state machine driver.
//!
//! All mutable UI data lives in one [`UiContext`], which the per-state
//! handlers in [`super::menu`], [`super::edit`] and [`super::dashboard`]
//! receive by `&mut`. A handler returns `Some(next)` to request a
//! transition; [`enter`] then resets the shared entry state (buffer, field
//! cursor) and prepares the new screen.

use super::dashboard::{self, DashboardPage};
use super::display::{DisplayPort, Frame, FrameCache};
use super::edit::{self, ActuatorEditContext, EditField, LightEditContext, ThresholdTarget};
use super::gesture::{GestureDecoder, KeyAction};
use super::input_logic::NumericInput;
use super::menu;
use super::session::ConfigEditSession;
use super::UiState;
use crate::config::{HmiConfig, TimeoutPolicy, INPUT_MAX_DIGITS};
use crate::error::{InputError, Result, StoreError};
use crate::keypad::{ButtonEvent, EventSource};
use crate::model::{ActuatorKind, Thresholds};
use crate::store::ConfigStore;
use crate::telemetry::Telemetry;
use crate::Millis;

/// Two-line message overlaying the active screen until `until`.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Notice {
    frame: Frame,
    until: Millis,
}

/// Everything the state handlers read and write.
pub struct UiContext {
    pub config: HmiConfig,
    pub state: UiState,
    pub session: ConfigEditSession,
    pub input: NumericInput<INPUT_MAX_DIGITS>,
    pub field: EditField,
    /// Actuator family / instance picked in the selection screens.
    pub select_kind: ActuatorKind,
    pub select_instance: usize,
    pub actuator: Option<ActuatorEditContext>,
    pub light: LightEditContext,
    /// Band of the threshold screen as it was on entry.
    pub entry_band: Thresholds,
    pub menu_cursor: usize,
    pub page: DashboardPage,
    /// Sensor count last reported by telemetry.
    pub sensors: u8,
    pub last_display_update: Millis,
    pub last_key_at: Millis,
    notice: Option<Notice>,
}

impl UiContext {
    pub fn new(config: HmiConfig, now: Millis) -> Self {
        Self {
            config,
            state: UiState::Dashboard,
            session: ConfigEditSession::new(),
            input: NumericInput::new(),
            field: EditField::First,
            select_kind: ActuatorKind::Heater,
            select_instance: 0,
            actuator: None,
            light: LightEditContext::default(),
            entry_band: Thresholds::new(0, 0),
            menu_cursor: 0,
            page: DashboardPage::Averages,
            sensors: 0,
            last_display_update: now,
            last_key_at: now,
            notice: None,
        }
    }

    /// Show a transient two-line message.
    pub fn notify(&mut self, top: &str, bottom: &str, now: Millis) {
        self.notice = Some(Notice {
            frame: Frame::text(top, bottom),
            until: now + self.config.notice_ms,
        });
    }

    /// Report a rejected entry; the buffer is cleared, the field kept.
    pub fn reject(&mut self, err: InputError, now: Millis) {
        debug!("UI: input rejected: {:?}", err);
        self.input.clear();
        self.notify("Error", err.label(), now);
    }

    pub fn report_store_error(&mut self, err: StoreError, now: Millis) {
        self.notify("Save failed", err.label(), now);
    }

    /// Append a typed digit, reporting a full buffer.
    pub fn type_digit(&mut self, d: u8, now: Millis) {
        if let Err(e) = self.input.push_digit(d) {
            self.notify("Error", e.label(), now);
        }
    }

    pub fn notice(&self) -> Option<&Frame> {
        self.notice.as_ref().map(|n| &n.frame)
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    fn expire_notice(&mut self, now: Millis) {
        if self.notice.as_ref().is_some_and(|n| now >= n.until) {
            self.notice = None;
        }
    }
}

/// Switch to `next`, resetting the per-screen entry state.
pub fn enter<S: ConfigStore + ?Sized>(ctx: &mut UiContext, store: &S, next: UiState, now: Millis) {
    let prev = ctx.state;
    ctx.input.clear();
    ctx.field = EditField::First;
    if next != UiState::ActuatorManualEdit {
        ctx.actuator = None;
    }

    let next = match next {
        UiState::Dashboard => {
            ctx.last_display_update = now;
            next
        }
        UiState::MenuRoot if prev == UiState::Dashboard => {
            ctx.session.begin(store);
            ctx.menu_cursor = 0;
            next
        }
        UiState::ActuatorManualEdit => {
            match ActuatorEditContext::load(ctx.session.working(), ctx.select_kind, ctx.select_instance) {
                Some(act) => {
                    ctx.actuator = Some(act);
                    next
                }
                None => {
                    warn!("UI: no {:?} #{}", ctx.select_kind, ctx.select_instance);
                    UiState::MenuRoot
                }
            }
        }
        UiState::EditGlobalTemp => {
            ctx.entry_band = ctx.session.working().temperature;
            next
        }
        UiState::EditGlobalHum => {
            ctx.entry_band = ctx.session.working().humidity;
            next
        }
        UiState::LightEdit => {
            ctx.light = LightEditContext::load(&ctx.session.working().light);
            next
        }
        _ => next,
    };

    if prev != next {
        debug!("UI: {:?} -> {:?}", prev, next);
    }
    ctx.state = next;
}

/// Route one key action to the handler of the active state.
fn dispatch<S: ConfigStore + ?Sized>(
    ctx: &mut UiContext,
    store: &mut S,
    action: KeyAction,
    now: Millis,
) -> Option<UiState> {
    match ctx.state {
        UiState::Dashboard => dashboard::handle(ctx, action, now),
        UiState::MenuRoot => menu::handle_root(ctx, action, now),
        UiState::EditGlobalTemp => edit::handle_threshold(ctx, ThresholdTarget::Temperature, action, now),
        UiState::EditGlobalHum => edit::handle_threshold(ctx, ThresholdTarget::Humidity, action, now),
        UiState::ActuatorSelectType => menu::handle_select_type(ctx, action, now),
        UiState::ActuatorSelectId => menu::handle_select_id(ctx, action, now),
        UiState::ActuatorMode => menu::handle_mode(ctx, action, now),
        UiState::ActuatorManualEdit => edit::handle_actuator(ctx, action, now),
        UiState::LightEdit => edit::handle_light(ctx, action, now),
        UiState::SaveAndExit => menu::handle_save(ctx, store, action, now),
        UiState::NotImplemented(_) => menu::handle_placeholder(ctx, action, now),
    }
}

/// Compose the screen of the active state.
fn render<T: Telemetry + ?Sized>(ctx: &UiContext, telemetry: &T) -> Frame {
    match ctx.state {
        UiState::Dashboard => dashboard::render(ctx.page, telemetry),
        UiState::MenuRoot => menu::render_root(ctx),
        UiState::EditGlobalTemp => edit::render_threshold(ctx, ThresholdTarget::Temperature),
        UiState::EditGlobalHum => edit::render_threshold(ctx, ThresholdTarget::Humidity),
        UiState::ActuatorSelectType => menu::render_select_type(),
        UiState::ActuatorSelectId => menu::render_select_id(ctx),
        UiState::ActuatorMode => menu::render_mode(ctx),
        UiState::ActuatorManualEdit => edit::render_actuator(ctx),
        UiState::LightEdit => edit::render_light(ctx),
        UiState::SaveAndExit => menu::render_save(ctx),
        UiState::NotImplemented(p) => menu::render_placeholder(p),
    }
}

/// The HMI: state machine plus the ports it talks to.
pub struct UiController<S, T, D> {
    ctx: UiContext,
    store: S,
    telemetry: T,
    display: D,
    cache: FrameCache,
    gestures: GestureDecoder,
    frame: Frame,
}

impl<S, T, D> UiController<S, T, D>
where
    S: ConfigStore,
    T: Telemetry,
    D: DisplayPort,
{
    pub fn new(config: HmiConfig, store: S, telemetry: T, display: D, now: Millis) -> Self {
        let mut ctx = UiContext::new(config, now);
        ctx.session.begin(&store);
        Self {
            ctx,
            store,
            telemetry,
            display,
            cache: FrameCache::new(),
            gestures: GestureDecoder::new(),
            frame: Frame::new(),
        }
    }

    /// Clear the display and draw the current screen.
    pub fn init(&mut self, now: Millis) -> Result<()> {
        info!("UI: init");
        self.cache.clear(&mut self.display)?;
        self.redraw(now)
    }

    /// Drain `events`, run the timers and redraw what changed.
    pub fn poll<E: EventSource + ?Sized>(&mut self, events: &mut E, now: Millis) -> Result<()> {
        while let Some(event) = events.next_event() {
            self.handle_event(event, now);
        }
        self.tick(now);
        self.redraw(now)
    }

    /// Feed a single key event.
    pub fn handle_event(&mut self, event: ButtonEvent, now: Millis) {
        trace!("UI: event {:?}", event);
        self.ctx.last_key_at = now;
        self.ctx.sensors = self.telemetry.sensor_count();

        let Some(action) = self.gestures.decode(event) else {
            return;
        };
        self.ctx.dismiss_notice();

        if let Some(next) = dispatch(&mut self.ctx, &mut self.store, action, now) {
            enter(&mut self.ctx, &self.store, next, now);
        }
    }

    /// Dashboard rotation, menu timeout and notice expiry.
    pub fn tick(&mut self, now: Millis) {
        let ctx = &mut self.ctx;
        ctx.expire_notice(now);
        ctx.sensors = self.telemetry.sensor_count();

        match ctx.state {
            UiState::Dashboard => {
                if now.saturating_sub(ctx.last_display_update) >= ctx.config.rotate_ms {
                    ctx.page = ctx.page.next(ctx.sensors);
                    ctx.last_display_update = now;
                }
            }
            _ => {
                if now.saturating_sub(ctx.last_key_at) >= ctx.config.timeout_ms {
                    self.timeout(now);
                }
            }
        }
    }

    fn timeout(&mut self, now: Millis) {
        let ctx = &mut self.ctx;
        info!("UI: menu timeout in {:?}", ctx.state);
        match ctx.config.timeout_policy {
            TimeoutPolicy::Discard => ctx.session.discard(&self.store),
            TimeoutPolicy::AutoSave if ctx.session.is_dirty() => {
                if ctx.session.save(&mut self.store).is_err() {
                    ctx.session.discard(&self.store);
                }
            }
            TimeoutPolicy::AutoSave => {}
        }
        enter(ctx, &self.store, UiState::Dashboard, now);
    }

    fn redraw(&mut self, now: Millis) -> Result<()> {
        self.ctx.expire_notice(now);
        self.frame = match self.ctx.notice() {
            Some(notice) => notice.clone(),
            None => render(&self.ctx, &self.telemetry),
        };
        self.cache.present(&mut self.display, &self.frame)?;
        Ok(())
    }

    pub fn state(&self) -> UiState {
        self.ctx.state
    }

    pub fn context(&self) -> &UiContext {
        &self.ctx
    }

    pub fn session(&self) -> &ConfigEditSession {
        &self.ctx.session
    }

    /// Frame most recently sent to the display.
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn telemetry_mut(&mut self) -> &mut T {
        &mut self.telemetry
    }

    pub fn display(&self) -> &D {
        &self.display
    }
}
