// src/output/console.rs
use super::relative_frequency;
use crate::batch::BatchOutcome;
use crate::report::ScoreReport;
use std::io::{self, Write};

/// Human-readable block for one report.
pub fn write_report<W: Write>(out: &mut W, report: &ScoreReport) -> io::Result<()> {
    writeln!(out, "{}", report.document_id())?;
    writeln!(out, "ExploreScore: {}", report.explore_score())?;
    writeln!(out, "ExploitScore: {}", report.exploit_score())?;
    writeln!(out, "Exploit:Explore ratio {}", report.ratio())?;
    writeln!(out)?;
    for pc in report.phrase_counts() {
        match relative_frequency(pc.count, report.total_tokens()) {
            Some(f) => writeln!(
                out,
                "{}: {:.6} ({} of {} tokens)",
                pc.phrase,
                f,
                pc.count,
                report.total_tokens()
            )?,
            None => writeln!(out, "{}: n/a (empty document)", pc.phrase)?,
        }
    }
    writeln!(out)
}

pub fn write_outcome<W: Write>(out: &mut W, outcome: &BatchOutcome) -> io::Result<()> {
    for report in &outcome.reports {
        write_report(out, report)?;
    }
    if !outcome.failures.is_empty() {
        writeln!(out, "Failed documents ({}):", outcome.failures.len())?;
        for f in &outcome.failures {
            writeln!(out, "  {}: {}", f.document_id, f.error)?;
        }
    }
    Ok(())
}

pub fn print_outcome(outcome: &BatchOutcome) -> io::Result<()> {
    let stdout = io::stdout();
    let mut lock = stdout.lock();
    write_outcome(&mut lock, outcome)?;
    lock.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::{PhraseDictionary, PhraseEntry};
    use crate::scorer::DocumentScorer;

    #[test]
    fn renders_scores_ratio_and_frequencies() {
        let d = PhraseDictionary::new(vec![
            PhraseEntry::new("growth", 1.0, 0.0).unwrap(),
            PhraseEntry::new("cost", 0.0, 1.0).unwrap(),
        ]);
        let r = DocumentScorer::new().score_text("acme.txt", "growth growth cost flat", &d);
        let mut buf = Vec::new();
        write_report(&mut buf, &r).unwrap();
        let s = String::from_utf8(buf).unwrap();
        assert!(s.starts_with("acme.txt\n"));
        assert!(s.contains("ExploreScore: 2\n"), "{s}");
        assert!(s.contains("Exploit:Explore ratio 0.5\n"), "{s}");
        assert!(s.contains("growth: 0.500000 (2 of 4 tokens)"), "{s}");
        assert!(s.contains("cost: 0.250000 (1 of 4 tokens)"), "{s}");
    }

    #[test]
    fn undefined_ratio_and_empty_document() {
        let d = PhraseDictionary::new(vec![PhraseEntry::new("growth", 1.0, 0.0).unwrap()]);
        let r = DocumentScorer::new().score_text("empty.txt", "", &d);
        let mut buf = Vec::new();
        write_report(&mut buf, &r).unwrap();
        let s = String::from_utf8(buf).unwrap();
        assert!(s.contains("Exploit:Explore ratio undefined"), "{s}");
        assert!(s.contains("growth: n/a"), "{s}");
    }
}
