//! Donut configuration model
//!
//! A donut is five independent enumerated attributes. The player's selection
//! and the target order share this type; a serve is correct iff all five
//! attributes match.

use serde::{Deserialize, Serialize};

/// Donut body shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Shape {
    #[default]
    Ring,
    Filled,
}

impl Shape {
    pub const ALL: [Shape; 2] = [Shape::Ring, Shape::Filled];
}

/// Dough flavor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DoughFlavor {
    #[default]
    Classic,
    Chocolate,
    RedVelvet,
    Matcha,
}

impl DoughFlavor {
    pub const ALL: [DoughFlavor; 4] = [
        DoughFlavor::Classic,
        DoughFlavor::Chocolate,
        DoughFlavor::RedVelvet,
        DoughFlavor::Matcha,
    ];
}

/// Glaze on top of the donut
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Topping {
    #[default]
    None,
    Chocolate,
    PinkGlaze,
    WhiteGlaze,
}

impl Topping {
    pub const ALL: [Topping; 4] = [
        Topping::None,
        Topping::Chocolate,
        Topping::PinkGlaze,
        Topping::WhiteGlaze,
    ];
}

/// Sprinkle style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Sprinkles {
    #[default]
    None,
    Rainbow,
    Chocolate,
    BlueWhite,
    Gold,
}

impl Sprinkles {
    pub const ALL: [Sprinkles; 5] = [
        Sprinkles::None,
        Sprinkles::Rainbow,
        Sprinkles::Chocolate,
        Sprinkles::BlueWhite,
        Sprinkles::Gold,
    ];
}

/// Filling (only meaningful for filled donuts)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Filling {
    #[default]
    None,
    Strawberry,
    Custard,
    Chocolate,
    Blueberry,
    Lemon,
}

impl Filling {
    pub const ALL: [Filling; 6] = [
        Filling::None,
        Filling::Strawberry,
        Filling::Custard,
        Filling::Chocolate,
        Filling::Blueberry,
        Filling::Lemon,
    ];
}

/// A complete donut: either the player's selection or the target order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct DonutConfig {
    pub shape: Shape,
    pub dough: DoughFlavor,
    pub topping: Topping,
    pub sprinkles: Sprinkles,
    pub filling: Filling,
}

impl DonutConfig {
    /// Plain classic ring, the selection every round starts from
    pub const INITIAL: DonutConfig = DonutConfig {
        shape: Shape::Ring,
        dough: DoughFlavor::Classic,
        topping: Topping::None,
        sprinkles: Sprinkles::None,
        filling: Filling::None,
    };

    /// Field-wise comparison against an order
    pub fn matches(&self, order: &DonutConfig) -> bool {
        self == order
    }

    /// Rings cannot hold a filling
    pub fn is_consistent(&self) -> bool {
        self.shape == Shape::Filled || self.filling == Filling::None
    }

    /// Merge a partial update.
    ///
    /// Shape is applied first; whenever the resulting shape is a ring the
    /// filling is forced back to `None`, whatever the patch asked for.
    pub fn apply(&mut self, patch: &DonutPatch) {
        if let Some(shape) = patch.shape {
            self.shape = shape;
        }
        if let Some(dough) = patch.dough {
            self.dough = dough;
        }
        if let Some(topping) = patch.topping {
            self.topping = topping;
        }
        if let Some(sprinkles) = patch.sprinkles {
            self.sprinkles = sprinkles;
        }
        if let Some(filling) = patch.filling {
            self.filling = filling;
        }
        if self.shape == Shape::Ring {
            self.filling = Filling::None;
        }
    }

    /// Copy with a patch applied
    pub fn with(mut self, patch: &DonutPatch) -> Self {
        self.apply(patch);
        self
    }
}

/// Partial update to a donut selection (one optional value per field)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DonutPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<Shape>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dough: Option<DoughFlavor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topping: Option<Topping>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sprinkles: Option<Sprinkles>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filling: Option<Filling>,
}

impl DonutPatch {
    pub fn shape(shape: Shape) -> Self {
        Self {
            shape: Some(shape),
            ..Default::default()
        }
    }

    pub fn dough(dough: DoughFlavor) -> Self {
        Self {
            dough: Some(dough),
            ..Default::default()
        }
    }

    pub fn topping(topping: Topping) -> Self {
        Self {
            topping: Some(topping),
            ..Default::default()
        }
    }

    pub fn sprinkles(sprinkles: Sprinkles) -> Self {
        Self {
            sprinkles: Some(sprinkles),
            ..Default::default()
        }
    }

    pub fn filling(filling: Filling) -> Self {
        Self {
            filling: Some(filling),
            ..Default::default()
        }
    }

    /// Patch that turns any selection into `target`
    pub fn full(target: &DonutConfig) -> Self {
        Self {
            shape: Some(target.shape),
            dough: Some(target.dough),
            topping: Some(target.topping),
            sprinkles: Some(target.sprinkles),
            filling: Some(target.filling),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.shape.is_none()
            && self.dough.is_none()
            && self.topping.is_none()
            && self.sprinkles.is_none()
            && self.filling.is_none()
    }

    /// Parse a `field=VALUE` pair as emitted by the option buttons
    /// (e.g. `dough=RED_VELVET`)
    pub fn parse_pair(field: &str, value: &str) -> Option<Self> {
        let value = serde_json::Value::String(value.to_ascii_uppercase());
        match field {
            "shape" => serde_json::from_value(value).ok().map(Self::shape),
            "dough" => serde_json::from_value(value).ok().map(Self::dough),
            "topping" => serde_json::from_value(value).ok().map(Self::topping),
            "sprinkles" => serde_json::from_value(value).ok().map(Self::sprinkles),
            "filling" => serde_json::from_value(value).ok().map(Self::filling),
            _ => None,
        }
    }
}
