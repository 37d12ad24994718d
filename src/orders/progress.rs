//! Order Progress
//!
//! Projects a completion percentage onto the fixed sequence of delivery
//! stages. Progress is recomputed from the percentage on every read.

use std::fmt::{Display, Formatter, Result as FmtResult};

/// Delivery stages in the order they complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeliveryStage {
    /// The restaurant accepted the order
    Confirmed,

    /// The kitchen is cooking
    Preparing,

    /// Packed and waiting for a rider
    Ready,

    /// A rider is on the way
    OutForDelivery,

    /// Handed over
    Delivered,
}

impl DeliveryStage {
    /// Every stage in canonical order.
    pub const ALL: [DeliveryStage; 5] = [
        DeliveryStage::Confirmed,
        DeliveryStage::Preparing,
        DeliveryStage::Ready,
        DeliveryStage::OutForDelivery,
        DeliveryStage::Delivered,
    ];

    /// Label shown under the stage marker.
    pub fn label(self) -> &'static str {
        match self {
            DeliveryStage::Confirmed => "Order Confirmed",
            DeliveryStage::Preparing => "Preparing",
            DeliveryStage::Ready => "Ready for Pickup",
            DeliveryStage::OutForDelivery => "Out for Delivery",
            DeliveryStage::Delivered => "Delivered",
        }
    }
}

impl Display for DeliveryStage {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.label())
    }
}

/// Number of stages complete at `percent`: `floor(percent / 100 × total_steps)`.
///
/// `percent` is clamped to `0..=100` first, so the result always lies in
/// `0..=total_steps`.
pub fn steps_completed(percent: i32, total_steps: u32) -> u32 {
    let percent = u64::from(percent.clamp(0, 100).unsigned_abs());
    let steps = percent * u64::from(total_steps) / 100;

    u32::try_from(steps).map_or(total_steps, |steps| steps.min(total_steps))
}

/// Label of the stage at `index` in the canonical sequence.
pub fn stage_label_for(index: usize) -> Option<&'static str> {
    DeliveryStage::ALL.get(index).copied().map(DeliveryStage::label)
}

/// How a stage is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageMarker {
    /// Checkmark
    Done,

    /// One-based position of the stage
    Pending(usize),
}

/// A stage with its marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageView {
    /// The stage
    pub stage: DeliveryStage,

    /// How to draw it
    pub marker: StageMarker,
}

impl StageView {
    /// Whether the stage is complete.
    pub fn is_done(&self) -> bool {
        self.marker == StageMarker::Done
    }
}

impl Display for StageView {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self.marker {
            StageMarker::Done => write!(f, "[✓] {}", self.stage),
            StageMarker::Pending(ordinal) => write!(f, "[{ordinal}] {}", self.stage),
        }
    }
}

/// Progress of an order across the delivery stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderProgress {
    percent: i32,
}

impl OrderProgress {
    /// Progress at the given completion percentage.
    pub fn new(percent: i32) -> Self {
        Self { percent }
    }

    /// Percentage as reported, unclamped.
    pub fn percent(&self) -> i32 {
        self.percent
    }

    /// Percentage clamped to `0..=100`, for a progress bar.
    pub fn bar_percent(&self) -> u8 {
        u8::try_from(self.percent.clamp(0, 100)).unwrap_or(100)
    }

    /// Stages complete at this percentage.
    pub fn steps_completed(&self) -> u32 {
        let total = u32::try_from(DeliveryStage::ALL.len()).unwrap_or(u32::MAX);

        steps_completed(self.percent, total)
    }

    /// The first stage not yet complete, `None` once delivered.
    pub fn current_stage(&self) -> Option<DeliveryStage> {
        self.stages().find(|view| !view.is_done()).map(|view| view.stage)
    }

    /// Every stage with its marker, in canonical order.
    pub fn stages(&self) -> impl Iterator<Item = StageView> + use<> {
        let completed = usize::try_from(self.steps_completed()).unwrap_or(usize::MAX);

        DeliveryStage::ALL
            .into_iter()
            .enumerate()
            .map(move |(index, stage)| StageView {
                stage,
                marker: if index < completed {
                    StageMarker::Done
                } else {
                    StageMarker::Pending(index + 1)
                },
            })
    }
}
