//! Operator dashboard served at `/`.  Static page; all live data comes
//! from `/api/status`.

pub const DASHBOARD_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Hazard Node</title>
<style>
body{font-family:sans-serif;margin:2em;background:#111;color:#eee}
.on{color:#f55}.off{color:#5f5}
button{font-size:1.2em;margin:.3em;padding:.4em 1.2em}
</style>
</head>
<body>
<h1>Hazard Node</h1>
<p>Relay: <b id="relay">?</b></p>
<p>Time: <span id="time">--:--:--</span> &middot; Uptime: <span id="uptime">0</span>s &middot; RSSI: <span id="rssi">0</span> dBm</p>
<button onclick="ctl(1)">ON</button><button onclick="ctl(0)">OFF</button>
<script>
function ctl(s){fetch('/api/control?state='+s).then(poll)}
function poll(){fetch('/api/status').then(r=>r.json()).then(d=>{
const r=document.getElementById('relay');r.textContent=d.relay?'ON':'OFF';r.className=d.relay?'on':'off';
document.getElementById('time').textContent=d.time;
document.getElementById('uptime').textContent=d.uptime;
document.getElementById('rssi').textContent=d.rssi;})}
setInterval(poll,1000);poll();
</script>
</body>
</html>
"#;
