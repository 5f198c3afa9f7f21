//! Fixed expectations about the image-analysis E2E test and its project.

pub struct Pattern {
    pub regex: &'static str,
    pub description: &'static str,
}

const fn pattern(regex: &'static str, description: &'static str) -> Pattern {
    Pattern { regex, description }
}

pub const STRUCTURE_PATTERNS: [Pattern; 13] = [
    pattern(r"WebApplicationFactory<Program>", "WebApplicationFactory usage"),
    pattern(r"IClassFixture<WebApplicationFactory<Program>>", "IClassFixture implementation"),
    pattern(r"\.env", "Environment file loading"),
    pattern(r"TEST_USERNAME.*TEST_PASSWORD", "Test credentials pattern"),
    pattern(r"LoginRequest", "Authentication request"),
    pattern(r"PostAsJsonAsync.*auth/login", "Login endpoint usage"),
    pattern(r"CreateAuthenticatedClient", "Authenticated client creation"),
    pattern(r"Authorization.*Bearer", "Bearer token authentication"),
    pattern(r"MultipartFormDataContent", "Image upload pattern"),
    pattern(r"MediaTypeHeaderValue.*image/png", "Image content type"),
    pattern(r"PostAsync.*images", "Image upload endpoint"),
    pattern(r"JobStatusResponse", "Job status checking"),
    pattern(r"\.Should\(\)", "FluentAssertions usage"),
];

pub const IMAGE_PATTERNS: [Pattern; 9] = [
    pattern(r"test-image\.png", "Test image file reference"),
    pattern(r"File\.ReadAllBytesAsync", "Image file reading"),
    pattern(r"ByteArrayContent.*imageBytes", "Image byte array handling"),
    pattern(r"image.*analysis.*prompt", "Image analysis prompt"),
    pattern(r"shapes.*colors.*text", "Expected analysis elements"),
    pattern(r"rectangle.*circle.*triangle", "Specific shape detection"),
    pattern(r"blue.*red.*green", "Color detection"),
    pattern(r"Output.*Should.*Contain", "Output validation assertions"),
    pattern(r"Length.*Should.*BeGreaterThan", "Response length validation"),
];

pub const AUTH_PATTERNS: [Pattern; 6] = [
    pattern(
        r#"var username = Environment\.GetEnvironmentVariable\("TEST_USERNAME"\);"#,
        "Username read from environment",
    ),
    pattern(
        r#"var password = Environment\.GetEnvironmentVariable\("TEST_PASSWORD"\);"#,
        "Password read from environment",
    ),
    pattern(r"var loginRequest = new LoginRequest", "Login request construction"),
    pattern(r"Username = username,\s*Password = password", "Credentials assignment"),
    pattern(r#"await _client\.PostAsJsonAsync\("/auth/login""#, "Login call"),
    pattern(
        r"CreateAuthenticatedClient\(loginResult\.Token\)",
        "Authenticated client from login token",
    ),
];

pub const REQUIRED_PACKAGES: [&str; 4] = [
    "Microsoft.AspNetCore.Mvc.Testing",
    "FluentAssertions",
    "xunit",
    "DotNetEnv",
];

pub const REQUIRED_ENV_VARS: [&str; 2] = ["TEST_USERNAME", "TEST_PASSWORD"];

pub const SMALL_IMAGE_BYTES: u64 = 1000;
pub const LARGE_IMAGE_BYTES: u64 = 50000;

pub const EXECUTION_SUMMARY: [&str; 13] = [
    "Load test credentials from .env file",
    "Create in-memory test server using WebApplicationFactory",
    "Authenticate using TEST_USERNAME/TEST_PASSWORD",
    "Create job with image analysis prompt",
    "Upload test-image.png via multipart form data",
    "Start job execution",
    "Poll job status until completion",
    "Verify the model identified shapes (rectangle, circle, triangle)",
    "Verify the model identified colors (blue, red, green)",
    "Verify the model identified text content",
    "Verify response length indicates detailed analysis",
    "Verify image file stored in job workspace",
    "Clean up test repositories and jobs",
];
