mod grants_adapter_tests;

pub(super) const GRANTS_AI_HEALTH: &str = include_str!("../../../tests/fixtures/grants_ai_health.html");
pub(super) const GRANTS_SHELL: &str = include_str!("../../../tests/fixtures/grants_shell.html");
pub(super) const GRANTS_RENDERED: &str = include_str!("../../../tests/fixtures/grants_rendered.html");
pub(super) const NSF_AWARD: &str = include_str!("../../../tests/fixtures/nsf_award.html");
pub(super) const NSF_UNAVAILABLE: &str = include_str!("../../../tests/fixtures/nsf_unavailable.html");
