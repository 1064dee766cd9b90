//! Inline stylesheets embedded in standalone documents.

/// Styles for a standalone copy of the on-screen view.
pub const SCREEN_CSS: &str = "\
body { font-family: 'Segoe UI', Roboto, Arial, sans-serif; color: #1f2933; background: #f5f7fa; margin: 0; padding: 2rem; }
.invoice { background: #fff; max-width: 860px; margin: 0 auto; padding: 2rem; border-radius: 8px; box-shadow: 0 2px 6px rgba(0,0,0,0.08); }
.invoice-meta { display: flex; gap: 3rem; margin-bottom: 1.5rem; }
.label { margin: 0; font-size: 0.8rem; text-transform: uppercase; color: #616e7c; }
.value { margin: 0.25rem 0 0; font-size: 1.1rem; font-weight: 600; }
.items-table { width: 100%; border-collapse: collapse; }
.items-table th, .items-table td { padding: 0.5rem 0.75rem; border-bottom: 1px solid #e4e7eb; text-align: left; }
.items-table th { background: #f0f4f8; font-weight: 600; }
.numeric { text-align: right !important; font-variant-numeric: tabular-nums; }
.empty { color: #9aa5b1; font-style: italic; }
.totals { margin: 1.5rem 0 0 auto; max-width: 320px; }
.total-row { display: flex; justify-content: space-between; padding: 0.35rem 0; }
.total-amount { border-top: 2px solid #1f2933; font-weight: 700; font-size: 1.15rem; }
";

/// Styles for the print-ready document.
pub const PRINT_CSS: &str = "\
@page { size: A4; margin: 18mm; }
body { font-family: Arial, Helvetica, sans-serif; color: #000; background: #fff; margin: 0; font-size: 11pt; }
.invoice { width: 100%; }
.invoice-meta { display: flex; gap: 3rem; margin-bottom: 12pt; }
.label { margin: 0; font-size: 8pt; text-transform: uppercase; color: #444; }
.value { margin: 2pt 0 0; font-size: 12pt; font-weight: bold; }
.items-table { width: 100%; border-collapse: collapse; page-break-inside: auto; }
.items-table tr { page-break-inside: avoid; }
.items-table th, .items-table td { padding: 4pt 6pt; border-bottom: 0.5pt solid #999; text-align: left; }
.items-table thead { display: table-header-group; }
.numeric { text-align: right !important; }
.empty { font-style: italic; }
.totals { margin: 12pt 0 0 auto; width: 45%; page-break-inside: avoid; }
.total-row { display: flex; justify-content: space-between; padding: 2pt 0; }
.total-amount { border-top: 1pt solid #000; font-weight: bold; }
";
