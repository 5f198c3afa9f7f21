//! What a model looking at the test image is expected to report, and what
//! the image-analysis E2E run is supposed to cover.

pub const EXPECTED_KEYWORDS: [&str; 10] = [
    "rectangle", "blue", "red", "green", "circle", "triangle", "test", "image", "shapes", "text",
];

pub const EXPECTED_ANALYSIS: [&str; 4] = [
    "Shapes: Should detect rectangle, circle, triangle",
    "Colors: Should detect blue, red, green, white, black",
    "Text: Should detect 'Test Image' and 'Shapes: Rectangle, Circle, Triangle'",
    "Layout: Should describe spatial arrangement of elements",
];

pub const E2E_CHECKLIST: [&str; 10] = [
    "Image upload via multipart form data",
    "Image storage in job workspace (/workspace/jobs/{jobId}/images/)",
    "Claude Code execution with image analysis",
    "Claude response contains shape identification",
    "Claude response contains color identification",
    "Claude response contains text recognition",
    "Claude response demonstrates understanding of spatial layout",
    "Response length indicates detailed analysis (>100 chars)",
    "Job status transitions: created → running → completed",
    "No errors in job execution",
];
