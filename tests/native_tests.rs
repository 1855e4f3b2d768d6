mod common;

use common::pdf_assertions::{info_title, outline_titles};
use common::{TestResult, init_logging, long_markdown, render_native};
use quire::{Block, NativeFlowRenderer, Report, parse};

#[test]
fn test_header_and_body_are_rendered() -> TestResult {
    init_logging();
    let report = Report::new("## Findings\nRevenue grew steadily.\n- North region\n- South region")
        .with_title("Quarterly Report")
        .with_info_line("Prepared: 2025-06-01");

    let pdf = render_native(&report)?;
    assert_pdf_page_count!(pdf, 1);
    assert_pdf_contains_text!(pdf, "Quarterly Report");
    assert_pdf_contains_text!(pdf, "Prepared: 2025-06-01");
    assert_pdf_contains_text!(pdf, "Findings");
    assert_pdf_contains_text!(pdf, "Revenue grew steadily.");
    assert_pdf_contains_text!(pdf, "North region");
    assert_eq!(info_title(&pdf.doc).as_deref(), Some("Quarterly Report"));
    Ok(())
}

#[test]
fn test_empty_report_is_a_single_blank_page() -> TestResult {
    init_logging();
    let pdf = render_native(&Report::new(""))?;
    assert_pdf_page_count!(pdf, 1);
    assert!(pdf.bytes.starts_with(b"%PDF-1.7"));
    assert!(pdf.bytes.ends_with(b"%%EOF\n") || pdf.bytes.ends_with(b"%%EOF"));
    Ok(())
}

#[test]
fn test_header_only_report() -> TestResult {
    init_logging();
    let report = Report::new("").with_title("Only a title");
    let pdf = render_native(&report)?;
    assert_pdf_page_count!(pdf, 1);
    assert_pdf_contains_text!(pdf, "Only a title");
    Ok(())
}

#[test]
fn test_bold_runs_use_bold_face() -> TestResult {
    init_logging();
    let pdf = render_native(&Report::new("plain **strong** plain"))?;
    assert_pdf_has_font!(pdf, "Bold");
    assert_pdf_contains_text!(pdf, "strong");
    assert_pdf_not_contains_text!(pdf, "**");
    Ok(())
}

#[test]
fn test_unterminated_bold_is_literal() -> TestResult {
    init_logging();
    let pdf = render_native(&Report::new("a **b c"))?;
    assert_pdf_contains_text!(pdf, "**b c");
    Ok(())
}

#[test]
fn test_four_hashes_stay_a_paragraph() -> TestResult {
    init_logging();
    let blocks = parse("#### Not a heading");
    assert_eq!(blocks, vec![Block::paragraph("#### Not a heading")]);

    let pdf = render_native(&Report::new("#### Not a heading"))?;
    assert_pdf_contains_text!(pdf, "#### Not a heading");
    assert!(outline_titles(&pdf.doc).is_empty());
    Ok(())
}

#[test]
fn test_headings_become_bookmarks() -> TestResult {
    init_logging();
    let pdf = render_native(&Report::new("# One\ntext\n## Two\n### Three"))?;
    assert_eq!(outline_titles(&pdf.doc), vec!["One", "Two", "Three"]);
    Ok(())
}

#[test]
fn test_long_report_paginates() -> TestResult {
    init_logging();
    let pdf = render_native(&Report::new(long_markdown(80)))?;
    assert_pdf_min_pages!(pdf, 2);
    assert_pdf_contains_text!(pdf, "Section 79");
    Ok(())
}

#[test]
fn test_info_line_breaks_render_as_separate_lines() -> TestResult {
    init_logging();
    let report = Report::new("")
        .with_title("T")
        .with_info_line("Name: Ada\nRole: Analyst");
    let renderer = NativeFlowRenderer::new();
    let doc = renderer.layout_blocks(&report.title, &report.info_lines, &[])?;
    assert_eq!(doc.page_text(0), vec!["T", "Name: Ada", "Role: Analyst"]);

    let pdf = render_native(&report)?;
    assert_pdf_contains_text!(pdf, "Role: Analyst");
    Ok(())
}

#[test]
fn test_page_size_matches_configuration() -> TestResult {
    init_logging();
    let pdf = render_native(&Report::new("x"))?;
    assert_pdf_page_size!(pdf, 1, 595.28, 841.89);
    Ok(())
}
