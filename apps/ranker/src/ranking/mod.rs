// Resume ranking: normalization, skill/experience extraction, semantic scoring,
// score combination, and ordering. `pipeline` wires the stages together;
// `handlers` is the HTTP surface over it.

pub mod combine;
pub mod engine;
pub mod experience;
pub mod handlers;
pub mod normalize;
pub mod pipeline;
pub mod semantic;
pub mod settings;
pub mod skills;
