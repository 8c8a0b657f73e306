// Services module
// Contains business logic separated by domain areas

pub mod ai; // AI transcription and timing alignment
