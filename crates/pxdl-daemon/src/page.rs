//! The single-page download form served at `GET /`.

/// Posts `symbol`, `start`, `end` and one `fields` entry per ticked box to
/// `/download`. All four boxes start checked.
pub const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <title>Stock history download</title>
  <style>
    body{font-family:sans-serif;padding:20px;max-width:480px;margin:auto;}
    input,button,label{margin:.4em 0;width:95%;padding:8px;}
    button{width:100%;background-color:#007bff;color:white;border:none;cursor:pointer;}
    fieldset{margin-top:.6em;border:1px solid #ccc;}
    h2{text-align:center;}
  </style>
</head>
<body>
<h2>Daily price history (CSV)</h2>
<form method="post" action="/download">
  Symbol: <input name="symbol" placeholder="e.g. 2330" required><br>
  Start date: <input type="date" name="start" required><br>
  End date: <input type="date" name="end" required><br>

  <fieldset>
    <legend>Columns</legend>
    <label><input type="checkbox" name="fields" value="Open" checked> Open</label>
    <label><input type="checkbox" name="fields" value="High" checked> High</label>
    <label><input type="checkbox" name="fields" value="Low" checked> Low</label>
    <label><input type="checkbox" name="fields" value="Close" checked> Close</label>
  </fieldset>

  <button type="submit">Download CSV</button>
</form>
</body>
</html>
"#;
