//! Framework de testes do kernel
//!
//! Suites rodadas no boot (`feature = "self_test"`) quando não há harness
//! de teste: cada caso é uma `fn() -> TestResult` e o relatório vai para o
//! log serial.

/// Resultado de teste
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestResult {
    Pass,
    Fail,
    Skip,
}

/// Um caso de teste
pub struct TestCase {
    pub name: &'static str,
    pub func: fn() -> TestResult,
}

impl TestCase {
    pub const fn new(name: &'static str, func: fn() -> TestResult) -> Self {
        Self { name, func }
    }
}

/// Contagem final de uma suite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SuiteReport {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl SuiteReport {
    pub fn ok(&self) -> bool {
        self.failed == 0
    }
}

/// Executa suite de testes
pub fn run_test_suite(_name: &str, tests: &[TestCase]) -> SuiteReport {
    crate::kinfo!("=== Executando suite:");
    crate::kinfo!(_name);

    let mut report = SuiteReport::default();
    for test in tests {
        match (test.func)() {
            TestResult::Pass => {
                crate::kok!(test.name);
                report.passed += 1;
            }
            TestResult::Fail => {
                crate::kfail!(test.name);
                report.failed += 1;
            }
            TestResult::Skip => {
                crate::kwarn!(test.name);
                report.skipped += 1;
            }
        }
    }

    crate::kinfo!("Resultados: passed=", report.passed);
    if !report.ok() {
        crate::kerror!("Resultados: failed=", report.failed);
    }
    report
}
