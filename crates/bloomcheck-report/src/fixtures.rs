use bloomcheck_core::model::AnalysisRequest;
use bloomcheck_core::{Analysis, AnalysisEngine, EngineConfig};

/// A small analysed paper with one ambiguous question.
pub fn sample_analysis() -> Analysis {
    let engine = AnalysisEngine::new(EngineConfig::default()).unwrap();
    let request = AnalysisRequest::new([
        "Define algorithm.",
        "Discuss this and that, etc.",
        "Evaluate whether <quicksort> & mergesort are stable.",
    ])
    .with_professor("Dr. O'Neil")
    .with_subject("Algorithms & Data");
    engine.analyze(&request).unwrap()
}
