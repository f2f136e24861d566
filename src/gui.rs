//! Display hints for property-editor widgets.
//!
//! A [`PropertyEditor`] holds the editable fields of one part module. Each
//! field may have a widget for the editor scene and one for the flight scene;
//! which one is live depends on the current [`GameScene`]. Pushing new hints
//! only changes widget metadata. A forced refresh additionally asks the host,
//! through [`DisplayRefresh`], to rebuild the live control. The field's change
//! listener is detached while that happens so the refresh is never reported
//! back as a user edit.

use log::warn;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GameScene {
    #[default]
    Editor,
    Flight,
    Other,
}

#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    Float(f32),
    Choice(String),
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FloatEditHints {
    pub min: f32,
    pub max: f32,
    pub inc_large: f32,
    pub inc_small: f32,
    pub inc_slide: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FloatRangeHints {
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScaleEditHints {
    pub intervals: Vec<f32>,
    pub increments: Vec<f32>,
}

/// Upper bound on the stops a scale widget is given.
pub const MAX_SCALE_STOPS: usize = 1024;

impl ScaleEditHints {
    /// Evenly spaced stops from `min` to `max`; `None` when fewer than two
    /// stops fit, more than [`MAX_SCALE_STOPS`] would be needed, or
    /// `increment` is not positive.
    pub fn uniform(min: f32, max: f32, increment: f32) -> Option<Self> {
        if increment <= 0.0 {
            return None;
        }
        let steps = ((max - min) / increment).round();
        if !steps.is_finite() || steps < 1.0 {
            return None;
        }
        if steps >= MAX_SCALE_STOPS as f32 {
            log::warn!(
                "Scale range {}..{} by {} needs more than {} stops",
                min,
                max,
                increment,
                MAX_SCALE_STOPS
            );
            return None;
        }
        let count = steps as usize + 1;
        let slide = increment * 0.05;
        let intervals = (0..count).map(|i| min + increment * i as f32).collect();
        let increments = vec![slide; count];
        Some(Self {
            intervals,
            increments,
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChooseOptionHints {
    pub options: Vec<String>,
    pub display: Vec<String>,
}

impl ChooseOptionHints {
    /// Fills empty option or display lists with a single `NONE` entry.
    pub fn normalized(mut options: Vec<String>, mut display: Vec<String>) -> Self {
        if display.is_empty() && !options.is_empty() {
            display = vec!["NONE".to_string()];
        }
        if options.is_empty() {
            options = vec!["NONE".to_string()];
        }
        Self { options, display }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Widget {
    FloatEdit(FloatEditHints),
    FloatRange(FloatRangeHints),
    ScaleEdit(ScaleEditHints),
    ChooseOption(ChooseOptionHints),
}

pub type ChangeListener = Box<dyn FnMut(&FieldValue)>;

pub struct Field {
    pub name: String,
    pub value: FieldValue,
    pub gui_active: bool,
    pub gui_active_editor: bool,
    pub editor_widget: Option<Widget>,
    pub flight_widget: Option<Widget>,
    on_changed: Option<ChangeListener>,
}

impl Field {
    pub fn new(name: impl Into<String>, value: FieldValue) -> Self {
        Self {
            name: name.into(),
            value,
            gui_active: true,
            gui_active_editor: true,
            editor_widget: None,
            flight_widget: None,
            on_changed: None,
        }
    }

    pub fn with_widgets(mut self, editor: Option<Widget>, flight: Option<Widget>) -> Self {
        self.editor_widget = editor;
        self.flight_widget = flight;
        self
    }

    pub fn set_listener(&mut self, listener: ChangeListener) {
        self.on_changed = Some(listener);
    }

    /// Sets the value as a user edit would, notifying the listener.
    pub fn set_value(&mut self, value: FieldValue) {
        self.value = value;
        if let Some(listener) = self.on_changed.as_mut() {
            listener(&self.value);
        }
    }

    fn widget_mut(&mut self, scene: GameScene) -> Option<&mut Widget> {
        match scene {
            GameScene::Editor => self.editor_widget.as_mut(),
            GameScene::Flight => self.flight_widget.as_mut(),
            GameScene::Other => None,
        }
    }
}

/// Host capability that rebuilds the live control of a field from its
/// current widget metadata and value.
pub trait DisplayRefresh {
    fn refresh(&mut self, field: &Field, widget: &Widget);
}

pub struct PropertyEditor<R: DisplayRefresh> {
    pub scene: GameScene,
    fields: Vec<Field>,
    refresher: R,
}

impl<R: DisplayRefresh> PropertyEditor<R> {
    pub fn new(scene: GameScene, refresher: R) -> Self {
        Self {
            scene,
            fields: Vec::new(),
            refresher,
        }
    }

    pub fn add_field(&mut self, field: Field) {
        self.fields.push(field);
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn field_mut(&mut self, name: &str) -> Option<&mut Field> {
        self.fields.iter_mut().find(|field| field.name == name)
    }

    pub fn refresher(&self) -> &R {
        &self.refresher
    }

    pub fn set_field_enabled_editor(&mut self, name: &str, active: bool) {
        if let Some(field) = self.field_mut(name) {
            field.gui_active_editor = active;
        }
    }

    pub fn set_field_enabled_flight(&mut self, name: &str, active: bool) {
        if let Some(field) = self.field_mut(name) {
            field.gui_active = active;
        }
    }

    pub fn update_float_edit(&mut self, name: &str, hints: FloatEditHints, force: bool) {
        let applied = self.with_widget(name, |widget| match widget {
            Widget::FloatEdit(current) => {
                *current = hints;
                true
            }
            _ => false,
        });
        if applied && force {
            self.refresh(name);
        }
    }

    /// Writes `value` into the field and redraws its float edit control.
    pub fn set_float_edit_value(&mut self, name: &str, value: f32) {
        let scene = self.scene;
        let Some(field) = self.field_mut(name) else {
            return;
        };
        if !matches!(field.widget_mut(scene), Some(Widget::FloatEdit(_))) {
            return;
        }
        field.value = FieldValue::Float(value);
        self.refresh(name);
    }

    pub fn update_float_range(&mut self, name: &str, min: f32, max: f32, step: f32, force: bool) {
        let applied = self.with_widget(name, |widget| match widget {
            Widget::FloatRange(current) => {
                *current = FloatRangeHints { min, max, step };
                true
            }
            _ => false,
        });
        if applied && force {
            self.refresh(name);
        }
    }

    pub fn update_scale_edit(&mut self, name: &str, hints: ScaleEditHints, force: bool) {
        let applied = self.with_widget(name, |widget| match widget {
            Widget::ScaleEdit(current) => {
                *current = hints;
                true
            }
            _ => false,
        });
        if applied && force {
            self.refresh(name);
        }
    }

    /// Rebuilds the scale edit stops from a range. A range with fewer than two
    /// stops hides the field in both scenes instead.
    #[allow(clippy::too_many_arguments)]
    pub fn update_scale_edit_range(
        &mut self,
        name: &str,
        min: f32,
        max: f32,
        increment: f32,
        flight: bool,
        editor: bool,
        force: bool,
    ) {
        let Some(field) = self.field_mut(name) else {
            return;
        };
        let Some(hints) = ScaleEditHints::uniform(min, max, increment) else {
            field.gui_active = false;
            field.gui_active_editor = false;
            return;
        };
        field.gui_active = flight;
        field.gui_active_editor = editor;
        self.update_scale_edit(name, hints, force);
    }

    /// Redraws the scale edit control with its current stops and value.
    pub fn refresh_scale_edit(&mut self, name: &str) {
        let scene = self.scene;
        let is_scale_edit = self
            .field_mut(name)
            .and_then(|field| field.widget_mut(scene))
            .is_some_and(|widget| matches!(widget, Widget::ScaleEdit(_)));
        if is_scale_edit {
            self.refresh(name);
        }
    }

    /// Replaces the choices of an editor-only choose option control.
    pub fn update_choose_option(
        &mut self,
        name: &str,
        options: Vec<String>,
        display: Vec<String>,
        force: bool,
        force_value: &str,
    ) {
        let hints = ChooseOptionHints::normalized(options, display);
        let Some(field) = self.field_mut(name) else {
            return;
        };
        field.gui_active_editor = hints.options.len() > 1;
        if self.scene != GameScene::Editor {
            return;
        }
        let selected = hints.options.iter().position(|option| option == force_value);
        let applied = self.with_widget(name, |widget| match widget {
            Widget::ChooseOption(current) => {
                *current = hints.clone();
                true
            }
            _ => false,
        });
        if !(applied && force) {
            return;
        }
        match selected {
            Some(idx) => {
                if let Some(field) = self.field_mut(name) {
                    field.value = FieldValue::Choice(hints.options[idx].clone());
                }
                self.refresh(name);
            }
            None => warn!(
                "Cannot select '{}' on field '{}': not one of its options",
                force_value, name
            ),
        }
    }

    /// Applies `update` to the live widget of `name`; false when there is none.
    fn with_widget(&mut self, name: &str, update: impl FnOnce(&mut Widget) -> bool) -> bool {
        let scene = self.scene;
        self.field_mut(name)
            .and_then(|field| field.widget_mut(scene))
            .is_some_and(update)
    }

    fn refresh(&mut self, name: &str) {
        let scene = self.scene;
        let Some(field) = self.fields.iter_mut().find(|field| field.name == name) else {
            return;
        };
        let listener = field.on_changed.take();
        let widget = match scene {
            GameScene::Editor => field.editor_widget.as_ref(),
            GameScene::Flight => field.flight_widget.as_ref(),
            GameScene::Other => None,
        };
        if let Some(widget) = widget {
            self.refresher.refresh(field, widget);
        }
        field.on_changed = listener;
    }
}
