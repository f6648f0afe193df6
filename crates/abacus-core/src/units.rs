//! Unit conversion tables.
//!
//! Every category except temperature is linear: each unit carries its factor
//! to the category base unit and `convert` is `value * from / to`.
//! Temperature pivots through Celsius.

use std::fmt;
use std::str::FromStr;

use crate::error::{CalcError, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    Length,
    Weight,
    Temperature,
    Volume,
    Area,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Unit {
    pub name: &'static str,
    pub symbol: &'static str,
    pub factor: f64,
}

const fn unit(name: &'static str, symbol: &'static str, factor: f64) -> Unit {
    Unit {
        name,
        symbol,
        factor,
    }
}

static LENGTH: [Unit; 8] = [
    unit("Millimeter", "mm", 0.001),
    unit("Centimeter", "cm", 0.01),
    unit("Meter", "m", 1.0),
    unit("Kilometer", "km", 1000.0),
    unit("Inch", "in", 0.0254),
    unit("Foot", "ft", 0.3048),
    unit("Yard", "yd", 0.9144),
    unit("Mile", "mi", 1609.344),
];

static WEIGHT: [Unit; 7] = [
    unit("Milligram", "mg", 0.001),
    unit("Gram", "g", 1.0),
    unit("Kilogram", "kg", 1000.0),
    unit("Ounce", "oz", 28.3495),
    unit("Pound", "lb", 453.592),
    unit("Stone", "st", 6350.29),
    unit("Ton", "t", 1_000_000.0),
];

static TEMPERATURE: [Unit; 3] = [
    unit("Celsius", "°C", 1.0),
    unit("Fahrenheit", "°F", 1.0),
    unit("Kelvin", "K", 1.0),
];

static VOLUME: [Unit; 8] = [
    unit("Milliliter", "ml", 0.001),
    unit("Liter", "l", 1.0),
    unit("Cubic Meter", "m³", 1000.0),
    unit("Fluid Ounce", "fl oz", 0.0295735),
    unit("Cup", "cup", 0.236588),
    unit("Pint", "pt", 0.473176),
    unit("Quart", "qt", 0.946353),
    unit("Gallon", "gal", 3.78541),
];

static AREA: [Unit; 9] = [
    unit("Square Millimeter", "mm²", 0.000001),
    unit("Square Centimeter", "cm²", 0.0001),
    unit("Square Meter", "m²", 1.0),
    unit("Square Kilometer", "km²", 1_000_000.0),
    unit("Square Inch", "in²", 0.00064516),
    unit("Square Foot", "ft²", 0.092903),
    unit("Square Yard", "yd²", 0.836127),
    unit("Acre", "acre", 4046.86),
    unit("Hectare", "ha", 10000.0),
];

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Length,
        Category::Weight,
        Category::Temperature,
        Category::Volume,
        Category::Area,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Category::Length => "Length",
            Category::Weight => "Weight",
            Category::Temperature => "Temperature",
            Category::Volume => "Volume",
            Category::Area => "Area",
        }
    }

    pub fn units(self) -> &'static [Unit] {
        match self {
            Category::Length => &LENGTH,
            Category::Weight => &WEIGHT,
            Category::Temperature => &TEMPERATURE,
            Category::Volume => &VOLUME,
            Category::Area => &AREA,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Category {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self> {
        Category::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CalcError::UnknownUnit(s.to_string()))
    }
}

/// Fold a unit spelling to a comparable key: `°C` ~ `c`, `m³` ~ `m3`.
fn normalize(s: &str) -> String {
    s.trim()
        .chars()
        .filter_map(|c| match c {
            '°' => None,
            '²' => Some('2'),
            '³' => Some('3'),
            c => Some(c.to_ascii_lowercase()),
        })
        .collect()
}

/// Look a unit up by symbol or name. An exact symbol match wins over a
/// case-insensitive one, so `m` and `M` can never collide.
pub fn find_unit(query: &str, category: Option<Category>) -> Result<(Category, &'static Unit)> {
    let categories: &[Category] = match &category {
        Some(c) => std::slice::from_ref(c),
        None => &Category::ALL,
    };

    let exact = categories.iter().find_map(|&c| {
        c.units()
            .iter()
            .find(|u| u.symbol == query.trim())
            .map(|u| (c, u))
    });
    if let Some(found) = exact {
        return Ok(found);
    }

    let key = normalize(query);
    categories
        .iter()
        .find_map(|&c| {
            c.units()
                .iter()
                .find(|u| normalize(u.symbol) == key || normalize(u.name) == key)
                .map(|u| (c, u))
        })
        .ok_or_else(|| CalcError::UnknownUnit(query.to_string()))
}

/// Convert between two units of the same category.
pub fn convert(value: f64, from: &Unit, to: &Unit, category: Category) -> f64 {
    if category == Category::Temperature {
        return convert_temperature(value, from.symbol, to.symbol);
    }
    value * from.factor / to.factor
}

/// Resolve both units by name or symbol and convert. The target unit must
/// belong to the source unit's category.
pub fn convert_units(value: f64, from: &str, to: &str, category: Option<Category>) -> Result<f64> {
    let (category, from_unit) = find_unit(from, category)?;
    let (_, to_unit) = find_unit(to, Some(category))?;
    Ok(convert(value, from_unit, to_unit, category))
}

fn convert_temperature(value: f64, from: &str, to: &str) -> f64 {
    let celsius = match from {
        "°F" => (value - 32.0) * 5.0 / 9.0,
        "K" => value - 273.15,
        _ => value,
    };
    match to {
        "°F" => celsius * 9.0 / 5.0 + 32.0,
        "K" => celsius + 273.15,
        _ => celsius,
    }
}
