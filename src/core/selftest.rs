//! Autoteste de boot
//!
//! Exercita edição de linha, clipping do raster, scroll e oclusão antes de
//! liberar os dispositivos. O resultado vai para o log serial.

use crate::drivers::input::InputRing;
use crate::drivers::video::{Raster, Rgb565};
use crate::klib::test_framework::{run_test_suite, SuiteReport, TestCase, TestResult};
use crate::wm::rect::{visible_region, Rect};

const DISPLAY_TESTS: &[TestCase] = &[
    TestCase::new("ring_line_editing", test_ring_line_editing),
    TestCase::new("ring_wraparound", test_ring_wraparound),
    TestCase::new("raster_clipping", test_raster_clipping),
    TestCase::new("raster_scroll", test_raster_scroll),
    TestCase::new("rect_occlusion", test_rect_occlusion),
];

/// Executa a suite do subsistema de vídeo/entrada
pub fn run() -> SuiteReport {
    run_test_suite("Display", DISPLAY_TESTS)
}

fn test_ring_line_editing() -> TestResult {
    let mut ring: InputRing<16> = InputRing::new();
    for &b in b"lx" {
        ring.push(b);
    }
    ring.rewind_char();
    ring.push(b's');
    ring.push(b'\n');
    ring.commit();
    for &b in b"junk" {
        ring.push(b);
    }
    if ring.kill_line() != 4 {
        crate::kerror!("(Selftest) kill_line apagou errado");
        return TestResult::Fail;
    }

    let mut line = [0u8; 3];
    for slot in line.iter_mut() {
        match ring.pop() {
            Some(b) => *slot = b,
            None => return TestResult::Fail,
        }
    }
    if &line != b"ls\n" || ring.pop().is_some() {
        crate::kerror!("(Selftest) Linha editada incorreta");
        return TestResult::Fail;
    }
    TestResult::Pass
}

fn test_ring_wraparound() -> TestResult {
    let mut ring: InputRing<4> = InputRing::new();
    for round in 0..10u8 {
        ring.push(round);
        ring.commit();
        if ring.pop() != Some(round) {
            crate::kerror!("(Selftest) Anel perdeu byte na volta=", round);
            return TestResult::Fail;
        }
    }
    if !ring.is_empty() {
        return TestResult::Fail;
    }
    TestResult::Pass
}

fn test_raster_clipping() -> TestResult {
    let mut raster = Raster::heap(16, 8);
    raster.clear(Rgb565::BLACK);
    raster.put_pixel(16, 0, Rgb565::WHITE);
    raster.put_pixel(0, 8, Rgb565::WHITE);
    raster.fill_rect(12, 4, 100, 100, Rgb565::RED);

    if raster.pixel(16, 0).is_some() || raster.pixel(15, 7) != Some(Rgb565::RED) {
        crate::kerror!("(Selftest) Clipping do raster falhou");
        return TestResult::Fail;
    }
    if raster.pixel(11, 4) != Some(Rgb565::BLACK) || raster.pixel(15, 3) != Some(Rgb565::BLACK) {
        return TestResult::Fail;
    }
    TestResult::Pass
}

fn test_raster_scroll() -> TestResult {
    let mut raster = Raster::heap(4, 4);
    raster.clear(Rgb565::BLACK);
    raster.fill_rect(0, 2, 4, 1, Rgb565::GREEN);
    raster.scroll_up(2, Rgb565::BLUE);

    let moved = raster.pixel(3, 0) == Some(Rgb565::GREEN);
    let filled = raster.pixel(0, 3) == Some(Rgb565::BLUE) && raster.pixel(0, 2) == Some(Rgb565::BLUE);
    if !moved || !filled {
        crate::kerror!("(Selftest) Scroll do raster incorreto");
        return TestResult::Fail;
    }
    TestResult::Pass
}

fn test_rect_occlusion() -> TestResult {
    let target = Rect::new(0, 0, 100, 100);
    let above = [Rect::new(25, 25, 50, 50), Rect::new(0, 0, 100, 10)];
    let visible = visible_region(target, above.iter());

    let expected = target.area() - 50 * 50 - 100 * 10;
    if visible.area() != expected {
        crate::kerror!("(Selftest) Area visivel=", visible.area());
        return TestResult::Fail;
    }
    if visible.iter().any(|r| above.iter().any(|a| r.intersect(a).is_some())) {
        crate::kerror!("(Selftest) Retangulo visivel sob oclusor");
        return TestResult::Fail;
    }
    TestResult::Pass
}
