use clap::ValueEnum;

/// Which of the two demos is running
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Dimension {
    #[value(name = "2d")]
    Two,
    #[value(name = "3d")]
    Three,
}

impl Dimension {
    /// Floats per particle in the flattened position buffer
    pub fn position_components(self) -> usize {
        match self {
            Dimension::Two => 2,
            Dimension::Three => 3,
        }
    }

    pub fn has_color(self) -> bool {
        matches!(self, Dimension::Two)
    }

    pub fn window_title(self) -> &'static str {
        match self {
            Dimension::Two => "Particles 2D",
            Dimension::Three => "Particles 3D",
        }
    }

    pub fn vertex_entry_point(self) -> &'static str {
        match self {
            Dimension::Two => "vertex_2d",
            Dimension::Three => "vertex_3d",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}
