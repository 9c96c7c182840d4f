//! Two-field sequential edit logic and the per-screen edit contexts.
//!
//! Every numeric edit screen edits a pair of values one field at a time:
//! the first field is checked against absolute bounds, the second against
//! the bounds plus a relation to the first. The contexts are pure; the
//! screen handlers further down wire them to key actions.

use super::controller::UiContext;
use super::display::Frame;
use super::gesture::{Gesture, KeyAction};
use super::input_logic::{cycle_next, cycle_prev};
use super::UiState;
use crate::config::{Bounds, EditLimits, Relation};
use crate::error::InputError;
use crate::keypad::ButtonId;
use crate::model::{ActuatorKind, LightSchedule, SystemConfig, Thresholds, TimeOfDay};
use crate::units::{DisplayDuration, TimeUnit};
use crate::Millis;

/// Which of the two fields is being typed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EditField {
    #[default]
    First,
    Second,
}

impl EditField {
    pub const fn toggle(self) -> Self {
        match self {
            EditField::First => EditField::Second,
            EditField::Second => EditField::First,
        }
    }

    pub const fn index(self) -> usize {
        match self {
            EditField::First => 0,
            EditField::Second => 1,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldPair {
    pub bounds: Bounds,
    pub relation: Relation,
}

impl FieldPair {
    pub const fn new(bounds: Bounds, relation: Relation) -> Self {
        Self { bounds, relation }
    }

    pub fn check_first(&self, value: u32) -> Result<u32, InputError> {
        if self.bounds.contains(value) {
            Ok(value)
        } else {
            Err(InputError::OutOfRange)
        }
    }

    pub fn check_second(&self, first: u32, value: u32) -> Result<u32, InputError> {
        let value = self.check_first(value)?;
        match self.relation {
            Relation::Ascending if value <= first => Err(InputError::NotAscending),
            _ => Ok(value),
        }
    }
}

/// Global band edited by the threshold screens.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ThresholdTarget {
    Temperature,
    Humidity,
}

impl ThresholdTarget {
    pub const fn title(self) -> &'static str {
        match self {
            ThresholdTarget::Temperature => "Temp",
            ThresholdTarget::Humidity => "Hum",
        }
    }

    pub const fn unit(self) -> &'static str {
        match self {
            ThresholdTarget::Temperature => "C",
            ThresholdTarget::Humidity => "%",
        }
    }

    pub fn fields(self, limits: &EditLimits) -> FieldPair {
        let bounds = match self {
            ThresholdTarget::Temperature => limits.temperature,
            ThresholdTarget::Humidity => limits.humidity,
        };
        FieldPair::new(bounds, Relation::Ascending)
    }

    pub fn get(self, config: &SystemConfig) -> Thresholds {
        match self {
            ThresholdTarget::Temperature => config.temperature,
            ThresholdTarget::Humidity => config.humidity,
        }
    }

    pub fn get_mut(self, config: &mut SystemConfig) -> &mut Thresholds {
        match self {
            ThresholdTarget::Temperature => &mut config.temperature,
            ThresholdTarget::Humidity => &mut config.humidity,
        }
    }
}

/// Convert a typed threshold to storage width.
pub fn to_threshold(value: u32) -> Result<u16, InputError> {
    u16::try_from(value).map_err(|_| InputError::OutOfRange)
}

/// Edit context of one actuator instance's timed cycle.
///
/// Durations are canonical seconds; `units` only affect display and the
/// interpretation of typed digits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ActuatorEditContext {
    pub kind: ActuatorKind,
    /// 0-based instance among actuators of `kind`.
    pub instance: usize,
    pub manual: bool,
    pub on_secs: u32,
    pub off_secs: u32,
    pub units: [TimeUnit; 2],
    /// On/off seconds as loaded, restored on cancel.
    loaded: [u32; 2],
}

impl ActuatorEditContext {
    /// Copy the stored cycle of `kind` #`instance` out of `config`.
    pub fn load(config: &SystemConfig, kind: ActuatorKind, instance: usize) -> Option<Self> {
        let a = config.actuator(kind, instance)?;
        Some(Self {
            kind,
            instance,
            manual: a.manual,
            on_secs: a.on_secs,
            off_secs: a.off_secs,
            units: [TimeUnit::best_fit(a.on_secs), TimeUnit::best_fit(a.off_secs)],
            loaded: [a.on_secs, a.off_secs],
        })
    }

    pub fn secs(&self, field: EditField) -> u32 {
        match field {
            EditField::First => self.on_secs,
            EditField::Second => self.off_secs,
        }
    }

    pub fn set_secs(&mut self, field: EditField, secs: u32) {
        match field {
            EditField::First => self.on_secs = secs,
            EditField::Second => self.off_secs = secs,
        }
    }

    pub fn unit(&self, field: EditField) -> TimeUnit {
        self.units[field.index()]
    }

    /// Switch the display unit of `field`; stored seconds are untouched.
    pub fn toggle_unit(&mut self, field: EditField) -> TimeUnit {
        let unit = &mut self.units[field.index()];
        *unit = unit.next();
        *unit
    }

    /// Interpret `typed` in the field's unit and check it.
    pub fn convert(&self, field: EditField, typed: u32, limits: &EditLimits) -> Result<u32, InputError> {
        let secs = self
            .unit(field)
            .to_seconds(typed)
            .ok_or(InputError::Overflow)?;
        let pair = FieldPair::new(limits.cycle, limits.cycle_relation);
        match field {
            EditField::First => pair.check_first(secs),
            EditField::Second => pair.check_second(self.on_secs, secs).map_err(|e| match e {
                InputError::NotAscending => InputError::OffNotLonger,
                e => e,
            }),
        }
    }

    pub fn is_modified(&self) -> bool {
        [self.on_secs, self.off_secs] != self.loaded
    }

    /// Reset both durations to the loaded values and write them back.
    pub fn restore(&mut self, config: &mut SystemConfig) {
        [self.on_secs, self.off_secs] = self.loaded;
        self.store_field(config, EditField::First);
        self.store_field(config, EditField::Second);
    }

    /// Write one field back into `config`.
    pub fn store_field(&self, config: &mut SystemConfig, field: EditField) {
        if let Some(a) = config.actuator_mut(self.kind, self.instance) {
            match field {
                EditField::First => a.on_secs = self.on_secs,
                EditField::Second => a.off_secs = self.off_secs,
            }
        }
    }
}

/// Sub-field of the light schedule screen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LightField {
    #[default]
    OnHour,
    OnMinute,
    OffHour,
    OffMinute,
}

impl LightField {
    const ALL: [LightField; 4] = [
        LightField::OnHour,
        LightField::OnMinute,
        LightField::OffHour,
        LightField::OffMinute,
    ];

    const fn index(self) -> usize {
        self as usize
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// Wrap-around modulus for Up/Down stepping.
    const fn modulus(self) -> u8 {
        match self {
            LightField::OnHour | LightField::OffHour => 24,
            LightField::OnMinute | LightField::OffMinute => 60,
        }
    }

    pub fn is_on_time(self) -> bool {
        matches!(self, LightField::OnHour | LightField::OnMinute)
    }

    pub fn is_hour(self) -> bool {
        matches!(self, LightField::OnHour | LightField::OffHour)
    }
}

/// Light schedule being edited: on hour, on minute, off hour, off minute.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LightEditContext {
    values: [u8; 4],
    pub selected: LightField,
}

impl LightEditContext {
    pub fn load(schedule: &LightSchedule) -> Self {
        Self {
            values: [
                schedule.on.hour,
                schedule.on.minute,
                schedule.off.hour,
                schedule.off.minute,
            ],
            selected: LightField::OnHour,
        }
    }

    pub fn value(&self, field: LightField) -> u8 {
        self.values[field.index()]
    }

    /// Shift digit `d` into the selected two-digit field.
    pub fn push_digit(&mut self, d: u8) {
        let v = &mut self.values[self.selected.index()];
        *v = (*v % 10) * 10 + d.min(9);
    }

    /// Drop the last typed digit of the selected field.
    pub fn erase(&mut self) {
        let v = &mut self.values[self.selected.index()];
        *v /= 10;
    }

    /// Step the selected field by ±1, wrapping within its clock range.
    pub fn step(&mut self, up: bool) {
        let m = self.selected.modulus();
        let v = &mut self.values[self.selected.index()];
        let cur = *v % m;
        *v = if up { (cur + 1) % m } else { (cur + m - 1) % m };
    }

    /// Validated schedule: clock ranges, and on ≠ off.
    pub fn schedule(&self) -> Result<LightSchedule, InputError> {
        let on = TimeOfDay::new(self.values[0], self.values[1]);
        let off = TimeOfDay::new(self.values[2], self.values[3]);
        if !on.is_valid() || !off.is_valid() {
            return Err(InputError::BadTime);
        }
        if on == off {
            return Err(InputError::SameTime);
        }
        Ok(LightSchedule { on, off })
    }
}

// Screen handlers

/// Outcome of the keys every two-field screen shares.
enum FieldKey {
    Handled,
    Cancel,
    Commit,
    Other,
}

/// Digits append, short Back/Erase erase, Up/Down switch field,
/// long Back cancels, short Enter commits.
fn field_key(ctx: &mut UiContext, action: KeyAction, now: Millis) -> FieldKey {
    if let Some(d) = action.digit() {
        ctx.type_digit(d, now);
        return FieldKey::Handled;
    }
    match (action.button, action.gesture) {
        (ButtonId::Back | ButtonId::Erase, Gesture::Short) => {
            ctx.input.erase();
            FieldKey::Handled
        }
        (ButtonId::Back, Gesture::Long) => FieldKey::Cancel,
        (ButtonId::Up | ButtonId::Down, Gesture::Short) => {
            ctx.field = ctx.field.toggle();
            ctx.input.clear();
            FieldKey::Handled
        }
        (ButtonId::Enter, Gesture::Short) => FieldKey::Commit,
        _ => FieldKey::Other,
    }
}

pub fn handle_threshold(
    ctx: &mut UiContext,
    target: ThresholdTarget,
    action: KeyAction,
    now: Millis,
) -> Option<UiState> {
    match field_key(ctx, action, now) {
        FieldKey::Handled | FieldKey::Other => None,
        FieldKey::Cancel => {
            if target.get(ctx.session.working()) != ctx.entry_band {
                *target.get_mut(ctx.session.working_mut()) = ctx.entry_band;
            }
            Some(UiState::MenuRoot)
        }
        FieldKey::Commit => commit_threshold(ctx, target, now),
    }
}

fn commit_threshold(ctx: &mut UiContext, target: ThresholdTarget, now: Millis) -> Option<UiState> {
    let pair = target.fields(&ctx.config.limits);
    let current = target.get(ctx.session.working());
    let field = ctx.field;
    let checked = ctx
        .input
        .value()
        .and_then(|v| match field {
            EditField::First => pair.check_first(v),
            EditField::Second => pair.check_second(u32::from(current.min), v),
        })
        .and_then(to_threshold);

    let value = match checked {
        Ok(v) => v,
        Err(e) => {
            ctx.reject(e, now);
            return None;
        }
    };

    ctx.input.clear();
    let band = target.get_mut(ctx.session.working_mut());
    match field {
        EditField::First => {
            band.min = value;
            ctx.field = EditField::Second;
            None
        }
        EditField::Second => {
            band.max = value;
            info!("UI: {} band staged", target.title());
            ctx.notify(target.title(), "limits set", now);
            Some(UiState::MenuRoot)
        }
    }
}

pub fn render_threshold(ctx: &UiContext, target: ThresholdTarget) -> Frame {
    let bounds = target.fields(&ctx.config.limits).bounds;
    let band = target.get(ctx.session.working());
    let (name, current) = match ctx.field {
        EditField::First => ("min", band.min),
        EditField::Second => ("max", band.max),
    };

    let mut frame = Frame::new();
    frame.write(
        0,
        format_args!("{} {} {}-{}{}", target.title(), name, bounds.min, bounds.max, target.unit()),
    );
    if ctx.input.is_empty() {
        frame.write(1, format_args!("Now: {}{}", current, target.unit()));
    } else {
        frame.write(1, format_args!("New: {}_", ctx.input.as_str()));
    }
    frame
}

/// Two-field on/off duration edit of the selected actuator.
///
/// Long Enter switches the active field's unit; long Left/Right jump to
/// the previous/next instance of the same kind.
pub fn handle_actuator(ctx: &mut UiContext, action: KeyAction, now: Millis) -> Option<UiState> {
    let Some(mut act) = ctx.actuator else {
        return Some(UiState::MenuRoot);
    };

    match (action.button, action.gesture) {
        (ButtonId::Enter, Gesture::Long) => {
            let unit = act.toggle_unit(ctx.field);
            debug!("UI: unit -> {}", unit.suffix());
            ctx.actuator = Some(act);
            return None;
        }
        (ButtonId::Left | ButtonId::Right, Gesture::Long) => {
            switch_instance(ctx, act, action.button == ButtonId::Right);
            return None;
        }
        _ => {}
    }

    match field_key(ctx, action, now) {
        FieldKey::Handled | FieldKey::Other => None,
        FieldKey::Cancel => {
            revert_actuator(ctx, act);
            Some(UiState::MenuRoot)
        }
        FieldKey::Commit => commit_actuator(ctx, act, now),
    }
}

/// Undo a committed on-field of an unfinished edit.
fn revert_actuator(ctx: &mut UiContext, mut act: ActuatorEditContext) {
    if act.is_modified() {
        act.restore(ctx.session.working_mut());
        debug!("UI: {:?} #{} cycle restored", act.kind, act.instance);
    }
}

fn switch_instance(ctx: &mut UiContext, act: ActuatorEditContext, forward: bool) {
    let count = ctx.session.working().count_of(act.kind);
    let instance = if forward {
        cycle_next(act.instance, count)
    } else {
        cycle_prev(act.instance, count)
    };
    if instance == act.instance {
        return;
    }
    revert_actuator(ctx, act);
    if let Some(next) = ActuatorEditContext::load(ctx.session.working(), act.kind, instance) {
        ctx.actuator = Some(next);
        ctx.select_instance = instance;
        ctx.field = EditField::First;
        ctx.input.clear();
    }
}

fn commit_actuator(ctx: &mut UiContext, mut act: ActuatorEditContext, now: Millis) -> Option<UiState> {
    let field = ctx.field;
    let limits = ctx.config.limits;
    let secs = match ctx.input.value().and_then(|v| act.convert(field, v, &limits)) {
        Ok(secs) => secs,
        Err(e) => {
            ctx.reject(e, now);
            return None;
        }
    };

    ctx.input.clear();
    act.set_secs(field, secs);
    let working = ctx.session.working_mut();
    act.store_field(working, field);

    match field {
        EditField::First => {
            ctx.field = EditField::Second;
            ctx.actuator = Some(act);
            None
        }
        EditField::Second => {
            act.manual = true;
            if let Some(a) = working.actuator_mut(act.kind, act.instance) {
                a.manual = true;
            }
            ctx.actuator = Some(act);
            info!("UI: {:?} #{} cycle staged", act.kind, act.instance);
            ctx.notify(act.kind.label(), "cycle set", now);
            Some(UiState::MenuRoot)
        }
    }
}

pub fn render_actuator(ctx: &UiContext) -> Frame {
    let mut frame = Frame::new();
    let Some(act) = ctx.actuator.as_ref() else {
        return frame;
    };
    let unit = act.unit(ctx.field);
    let name = match ctx.field {
        EditField::First => "On",
        EditField::Second => "Off",
    };

    frame.write(
        0,
        format_args!("{}{} {} [{}]", act.kind.tag(), act.instance + 1, name, unit.suffix()),
    );
    if ctx.input.is_empty() {
        frame.write(
            1,
            format_args!("Now: {}", DisplayDuration::new(act.secs(ctx.field), unit)),
        );
    } else {
        frame.write(1, format_args!("New: {}{}_", ctx.input.as_str(), unit.suffix()));
    }
    frame
}

pub fn handle_light(ctx: &mut UiContext, action: KeyAction, now: Millis) -> Option<UiState> {
    if let Some(d) = action.digit() {
        ctx.light.push_digit(d);
        return None;
    }
    let light = &mut ctx.light;
    match (action.button, action.gesture) {
        (ButtonId::Left, Gesture::Short) => light.selected = light.selected.prev(),
        (ButtonId::Right, Gesture::Short) => light.selected = light.selected.next(),
        (ButtonId::Up, Gesture::Short) => light.step(true),
        (ButtonId::Down, Gesture::Short) => light.step(false),
        (ButtonId::Back | ButtonId::Erase, Gesture::Short) => light.erase(),
        (ButtonId::Back, Gesture::Long) => return Some(UiState::MenuRoot),
        (ButtonId::Enter, Gesture::Short) => return commit_light(ctx, now),
        _ => {}
    }
    None
}

fn commit_light(ctx: &mut UiContext, now: Millis) -> Option<UiState> {
    match ctx.light.schedule() {
        Ok(schedule) => {
            ctx.session.working_mut().light = schedule;
            ctx.notify("Light sched", "set", now);
            Some(UiState::MenuRoot)
        }
        Err(e) => {
            ctx.notify("Error", e.label(), now);
            None
        }
    }
}

pub fn render_light(ctx: &UiContext) -> Frame {
    let l = &ctx.light;
    let mut frame = Frame::new();
    frame.write(
        0,
        format_args!(
            "L {:02}:{:02}-{:02}:{:02}",
            l.value(LightField::OnHour),
            l.value(LightField::OnMinute),
            l.value(LightField::OffHour),
            l.value(LightField::OffMinute)
        ),
    );
    let sel = l.selected;
    frame.write(
        1,
        format_args!(
            "Set {} {}",
            if sel.is_on_time() { "on" } else { "off" },
            if sel.is_hour() { "hour" } else { "minute" }
        ),
    );
    frame
}
