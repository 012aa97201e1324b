use crate::config::{Config, StaleResultPolicy};
use crate::device_camera::interface::Frame;
use crate::device_orientation::interface::{DeviceOrientation, ImageOrientation};
use crate::image_classifier::interface::Classification;

pub const UNKNOWN_ELEMENT: &str = "Unknown element";

pub type RequestId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    FrameCaptured,
    Classifying,
    LabelRendered,
}

#[derive(Debug, Clone, Default)]
pub struct State {
    pub phase: Phase,
    pub current_frame: Option<Frame>,
    pub classification: String,
    pub next_request: RequestId,
    pub latest_request: Option<RequestId>,
    pub in_flight: usize,
}

#[derive(Debug)]
pub enum Event {
    Tapped {
        frame: Option<Frame>,
        orientation: DeviceOrientation,
    },
    ClassifyDone {
        request: RequestId,
        result: Result<Vec<Classification>, Box<dyn std::error::Error + Send + Sync>>,
        surface_alive: bool,
    },
}

/// What a worker reports back for one request. The coordinator turns it into
/// `Event::ClassifyDone` once it knows whether the surface is still there.
#[derive(Debug)]
pub struct ClassifyOutcome {
    pub request: RequestId,
    pub result: Result<Vec<Classification>, Box<dyn std::error::Error + Send + Sync>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    ClassifyFrame {
        request: RequestId,
        frame: Frame,
        orientation: ImageOrientation,
    },
    ReplaceLabel {
        label: String,
        identifier: String,
    },
    DropStaleResult {
        request: RequestId,
        latest: RequestId,
    },
}

impl Effect {
    pub fn to_display_string(&self) -> String {
        match self {
            Effect::ClassifyFrame {
                request,
                frame,
                orientation,
            } => format!(
                "ClassifyFrame {{ request: {}, frame: {}, orientation: {:?} }}",
                request, frame.id, orientation
            ),
            effect => format!("{:?}", effect),
        }
    }
}

/// Top label up to its first comma, or the fallback when there is none.
pub fn label_text(classifications: &[Classification]) -> String {
    classifications
        .first()
        .and_then(|top| top.label.split(',').find(|part| !part.is_empty()))
        .unwrap_or(UNKNOWN_ELEMENT)
        .to_string()
}

pub fn init() -> State {
    State::default()
}

pub fn capture_frame(mut state: State, frame: Option<Frame>) -> State {
    state.current_frame = frame;
    state.phase = Phase::FrameCaptured;
    state
}

pub fn classify_image(mut state: State, orientation: DeviceOrientation) -> (State, Vec<Effect>) {
    let (frame, orientation) = match (state.current_frame.clone(), orientation.image_orientation())
    {
        (Some(frame), Some(orientation)) => (frame, orientation),
        _ => {
            state.phase = settled_phase(&state, Phase::Idle);
            return (state, vec![]);
        }
    };

    let request = state.next_request;
    state.next_request += 1;
    state.latest_request = Some(request);
    state.in_flight += 1;
    state.phase = Phase::Classifying;

    (
        state,
        vec![Effect::ClassifyFrame {
            request,
            frame,
            orientation,
        }],
    )
}

pub fn transition(config: &Config, state: State, event: Event) -> (State, Vec<Effect>) {
    match event {
        Event::Tapped { frame, orientation } => {
            let state = capture_frame(state, frame);
            classify_image(state, orientation)
        }
        Event::ClassifyDone {
            request,
            result,
            surface_alive,
        } => {
            let mut state = state;
            state.in_flight = state.in_flight.saturating_sub(1);

            let classifications = match result {
                Ok(classifications) => classifications,
                // Already logged by the worker
                Err(_) => {
                    state.phase = settled_phase(&state, Phase::Idle);
                    return (state, vec![]);
                }
            };

            if !surface_alive {
                state.phase = settled_phase(&state, Phase::Idle);
                return (state, vec![]);
            }

            if let (StaleResultPolicy::LatestRequestWins, Some(latest)) =
                (config.stale_result_policy, state.latest_request)
            {
                if request < latest {
                    state.phase = settled_phase(&state, Phase::Idle);
                    return (state, vec![Effect::DropStaleResult { request, latest }]);
                }
            }

            let identifier = match classifications.first() {
                Some(top) => top.label.clone(),
                None => {
                    state.phase = settled_phase(&state, Phase::Idle);
                    return (state, vec![]);
                }
            };

            let label = label_text(&classifications);
            state.classification = label.clone();
            state.phase = settled_phase(&state, Phase::LabelRendered);

            (state, vec![Effect::ReplaceLabel { label, identifier }])
        }
    }
}

/// `Classifying` while other requests are still out, otherwise `done`.
fn settled_phase(state: &State, done: Phase) -> Phase {
    if state.in_flight > 0 {
        Phase::Classifying
    } else {
        done
    }
}
