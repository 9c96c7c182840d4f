//! Menu navigation screens: root listing, actuator selection, mode pick,
//! save confirmation and placeholders.

use super::controller::UiContext;
use super::display::Frame;
use super::gesture::{Gesture, KeyAction};
use super::input_logic::{cycle_next, cycle_prev, select_next, select_prev};
use super::{Placeholder, UiState};
use crate::keypad::ButtonId;
use crate::model::ActuatorKind;
use crate::store::ConfigStore;
use crate::Millis;

/// Root menu entries, selected by digit `index + 1`.
pub const MENU_ITEMS: [(&str, UiState); 7] = [
    ("Temp limits", UiState::EditGlobalTemp),
    ("Hum limits", UiState::EditGlobalHum),
    ("Actuators", UiState::ActuatorSelectType),
    ("Light sched", UiState::LightEdit),
    ("Save & exit", UiState::SaveAndExit),
    ("Network", UiState::NotImplemented(Placeholder::Network)),
    ("Calibration", UiState::NotImplemented(Placeholder::Calibration)),
];

fn menu_item(digit: u8) -> Option<UiState> {
    let index = usize::from(digit).checked_sub(1)?;
    MENU_ITEMS.get(index).map(|(_, state)| *state)
}

pub fn handle_root(ctx: &mut UiContext, action: KeyAction, _now: Millis) -> Option<UiState> {
    if let Some(d) = action.digit() {
        return menu_item(d);
    }
    match (action.button, action.gesture) {
        (ButtonId::Up, Gesture::Short) => {
            ctx.menu_cursor = select_prev(ctx.menu_cursor);
            None
        }
        (ButtonId::Down, Gesture::Short) => {
            ctx.menu_cursor = select_next(ctx.menu_cursor, MENU_ITEMS.len());
            None
        }
        (ButtonId::Enter, Gesture::Short) => MENU_ITEMS.get(ctx.menu_cursor).map(|(_, s)| *s),
        (ButtonId::Back, Gesture::Short) => Some(UiState::Dashboard),
        _ => None,
    }
}

pub fn render_root(ctx: &UiContext) -> Frame {
    let mut frame = Frame::new();
    for row in 0..2 {
        let index = ctx.menu_cursor + row;
        if let Some((label, _)) = MENU_ITEMS.get(index) {
            let marker = if row == 0 { '>' } else { ' ' };
            frame.write(row, format_args!("{}{} {}", marker, index + 1, label));
        }
    }
    frame
}

pub fn handle_select_type(ctx: &mut UiContext, action: KeyAction, now: Millis) -> Option<UiState> {
    if let Some(d) = action.digit() {
        let kind = *ActuatorKind::ALL.get(usize::from(d).checked_sub(1)?)?;
        if ctx.session.working().count_of(kind) == 0 {
            ctx.notify(kind.label(), "None fitted", now);
            return None;
        }
        ctx.select_kind = kind;
        ctx.select_instance = 0;
        return Some(UiState::ActuatorSelectId);
    }
    action.is_short(ButtonId::Back).then_some(UiState::MenuRoot)
}

pub fn render_select_type() -> Frame {
    Frame::text("Actuator type", "1Heat 2Humi 3Fan")
}

pub fn handle_select_id(ctx: &mut UiContext, action: KeyAction, now: Millis) -> Option<UiState> {
    let count = ctx.session.working().count_of(ctx.select_kind);
    if let Some(d) = action.digit() {
        match usize::from(d) {
            n if (1..=count).contains(&n) => ctx.select_instance = n - 1,
            _ => ctx.notify("Error", "No such unit", now),
        }
        return None;
    }
    match (action.button, action.gesture) {
        (ButtonId::Left, Gesture::Short) => {
            ctx.select_instance = cycle_prev(ctx.select_instance, count);
            None
        }
        (ButtonId::Right, Gesture::Short) => {
            ctx.select_instance = cycle_next(ctx.select_instance, count);
            None
        }
        (ButtonId::Enter, Gesture::Short) => Some(UiState::ActuatorMode),
        (ButtonId::Back, Gesture::Short) => Some(UiState::ActuatorSelectType),
        _ => None,
    }
}

pub fn render_select_id(ctx: &UiContext) -> Frame {
    let count = ctx.session.working().count_of(ctx.select_kind);
    let mut frame = Frame::new();
    frame.write(
        0,
        format_args!("{} {}/{}", ctx.select_kind.label(), ctx.select_instance + 1, count),
    );
    frame.set(1, "<> pick Enter=ok");
    frame
}

pub fn handle_mode(ctx: &mut UiContext, action: KeyAction, now: Millis) -> Option<UiState> {
    match action.digit() {
        Some(1) => {
            let (kind, instance) = (ctx.select_kind, ctx.select_instance);
            if let Some(a) = ctx.session.working_mut().actuator_mut(kind, instance) {
                a.manual = false;
            }
            info!("UI: {:?} #{} set to auto", kind, instance);
            ctx.notify(kind.label(), "Mode: Auto", now);
            Some(UiState::MenuRoot)
        }
        Some(2) => Some(UiState::ActuatorManualEdit),
        Some(_) => None,
        None => action.is_short(ButtonId::Back).then_some(UiState::ActuatorSelectId),
    }
}

pub fn render_mode(ctx: &UiContext) -> Frame {
    let manual = ctx
        .session
        .working()
        .actuator(ctx.select_kind, ctx.select_instance)
        .is_some_and(|a| a.manual);
    let mut frame = Frame::new();
    frame.write(
        0,
        format_args!(
            "{}{} now {}",
            ctx.select_kind.tag(),
            ctx.select_instance + 1,
            if manual { "Manual" } else { "Auto" }
        ),
    );
    frame.set(1, "1 Auto 2 Manual");
    frame
}

/// Short Enter commits a modified working copy; short Back returns to the menu.
pub fn handle_save<S: ConfigStore + ?Sized>(
    ctx: &mut UiContext,
    store: &mut S,
    action: KeyAction,
    now: Millis,
) -> Option<UiState> {
    if action.is_short(ButtonId::Enter) {
        if !ctx.session.is_dirty() {
            return Some(UiState::Dashboard);
        }
        return match ctx.session.save(store) {
            Ok(()) => {
                ctx.notify("Settings", "saved", now);
                Some(UiState::Dashboard)
            }
            Err(e) => {
                ctx.report_store_error(e, now);
                None
            }
        };
    }
    action.is_short(ButtonId::Back).then_some(UiState::MenuRoot)
}

pub fn render_save(ctx: &UiContext) -> Frame {
    let top = if ctx.session.is_dirty() {
        "Save changes?"
    } else {
        "No changes"
    };
    Frame::text(top, "Enter=Y  Back=N")
}

/// Any short key leaves the placeholder.
pub fn handle_placeholder(_ctx: &mut UiContext, action: KeyAction, _now: Millis) -> Option<UiState> {
    (action.gesture == Gesture::Short).then_some(UiState::MenuRoot)
}

pub fn render_placeholder(placeholder: Placeholder) -> Frame {
    Frame::text(placeholder.label(), "Not available")
}
