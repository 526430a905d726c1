//! Static page template for the zone map.
//!
//! Kept as a `&'static str` so the binary needs no asset files. Tokens of the
//! form `__NAME__` are filled in by [`crate::core::render`].

pub const ZONE_MAP_HTML: &str = r#"<!doctype html>
<html lang="en">

<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>__TITLE__</title>

  <!-- Leaflet 1.9.4 -->
  <link rel="stylesheet" href="https://cdnjs.cloudflare.com/ajax/libs/leaflet/1.9.4/leaflet.css" crossorigin="anonymous" />
  <script src="https://cdnjs.cloudflare.com/ajax/libs/leaflet/1.9.4/leaflet.js" crossorigin="anonymous"></script>

  <!-- leaflet-search 3.0.2 -->
  <link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/leaflet-search@3.0.2/dist/leaflet-search.min.css" />
  <script src="https://cdn.jsdelivr.net/npm/leaflet-search@3.0.2/dist/leaflet-search.min.js"></script>

  <style>
    html, body { height: 100%; margin: 0; font-family: system-ui, sans-serif; }
    #map { position: absolute; inset: 0; }
    .zone-panel {
      background: rgba(255, 255, 255, 0.95);
      padding: 8px 10px;
      border-radius: 6px;
      box-shadow: 0 1px 6px rgba(0, 0, 0, 0.3);
      font-size: 13px;
      line-height: 1.4;
    }
    .zone-panel h4 { margin: 0 0 6px; font-size: 14px; }
    .zone-row { display: flex; align-items: center; gap: 6px; margin: 2px 0; }
    .zone-swatch {
      width: 16px; height: 16px; border: 1px solid #333; border-radius: 3px; flex: none;
    }
    .zone-brush {
      display: flex; align-items: center; gap: 6px; width: 100%;
      margin: 2px 0; padding: 3px 6px; border: 1px solid #bbb; border-radius: 4px;
      background: #fff; cursor: pointer; font: inherit; text-align: left;
    }
    .zone-brush.active { border-color: #1d4ed8; box-shadow: 0 0 0 2px rgba(29, 78, 216, 0.35); }
    .zone-actions { display: flex; flex-wrap: wrap; gap: 4px; margin-top: 6px; }
    .zone-actions button {
      padding: 3px 8px; border: 1px solid #999; border-radius: 4px; background: #f5f5f5;
      cursor: pointer; font: inherit;
    }
    .zone-actions button:disabled { opacity: 0.5; cursor: default; }
    .zone-status { margin-top: 6px; color: #444; }
    .zone-footer { margin-top: 4px; color: #777; font-size: 11px; }
  </style>
</head>

<body>
  <div id="map"></div>

  <script>
    (function () {
      'use strict';

      const CONFIG = __CONFIG_JSON__;
      const DATA = __DATA_JSON__;
      const ZONES = CONFIG.zones;
      const FALLBACK_ZONE = ZONES.length - 1;

      const map = L.map('map').setView(CONFIG.center, CONFIG.zoom);
      L.tileLayer(CONFIG.tiles, { attribution: CONFIG.attribution, maxZoom: 19 }).addTo(map);

      // ---------------- overrides ----------------

      function loadOverrides() {
        try {
          const raw = window.localStorage.getItem(CONFIG.storageKey);
          const parsed = raw ? JSON.parse(raw) : {};
          return parsed && typeof parsed === 'object' && !Array.isArray(parsed) ? parsed : {};
        } catch (err) {
          console.warn('Ignoring unreadable zone overrides', err);
          return {};
        }
      }

      function saveOverrides() {
        try {
          window.localStorage.setItem(CONFIG.storageKey, JSON.stringify(overrides));
        } catch (err) {
          console.warn('Could not persist zone overrides', err);
        }
      }

      let overrides = loadOverrides();
      const undoStack = [];
      let brush = null;

      function baseZone(props) {
        const zone = Number(props.zone);
        return Number.isInteger(zone) && ZONES[zone] ? zone : FALLBACK_ZONE;
      }

      function zoneOf(props) {
        if (Object.prototype.hasOwnProperty.call(overrides, props.search_key)) {
          const zone = Number(overrides[props.search_key]);
          if (Number.isInteger(zone) && ZONES[zone]) return zone;
        }
        return baseZone(props);
      }

      // ---------------- layer ----------------

      const HIGHLIGHT = { fillColor: '#ffff00', color: 'blue', weight: 3, fillOpacity: 0.9 };

      function styleFor(feature) {
        return {
          fillColor: ZONES[zoneOf(feature.properties)].color,
          color: 'black',
          weight: 1.5,
          fillOpacity: CONFIG.fillOpacity,
        };
      }

      function escapeHtml(value) {
        return String(value == null ? '' : value)
          .replace(/&/g, '&amp;')
          .replace(/</g, '&lt;')
          .replace(/>/g, '&gt;')
          .replace(/"/g, '&quot;');
      }

      function tooltipHtml(props) {
        const zone = zoneOf(props);
        const rows = [
          ['Postcode', props.postcode],
          ['Suburb', props.suburb],
          ['Distance', props.distance_range],
          ['Delivery Fee', ZONES[zone].fee],
        ];
        if (zone !== baseZone(props)) {
          rows.push(['Zone (manual)', ZONES[zone].label]);
        }
        return '<table>' + rows.map(function (row) {
          return '<tr><th style="text-align:left;padding-right:8px">' + escapeHtml(row[0]) +
            '</th><td>' + escapeHtml(row[1]) + '</td></tr>';
        }).join('') + '</table>';
      }

      const layer = L.geoJSON(DATA, {
        style: styleFor,
        onEachFeature: function (feature, lyr) {
          lyr.bindTooltip(function () { return tooltipHtml(feature.properties); }, {
            sticky: true,
            opacity: 0.9,
          });
          lyr.on({
            mouseover: function (e) { e.target.setStyle(HIGHLIGHT); },
            mouseout: function (e) { layer.resetStyle(e.target); },
            click: function () { paint(feature, lyr); },
          });
        },
      }).addTo(map);

      const layers = {};
      layers[CONFIG.layerName] = layer;
      L.control.layers(null, layers, { collapsed: true }).addTo(map);

      if (L.Control.Search) {
        map.addControl(new L.Control.Search({
          layer: layer,
          propertyName: 'search_key',
          textPlaceholder: CONFIG.searchPlaceholder,
          collapsed: false,
          initial: false,
          marker: false,
          moveToLocation: function (latlng, title, m) {
            if (latlng.layer && latlng.layer.getBounds) {
              m.fitBounds(latlng.layer.getBounds());
            } else {
              m.setView(latlng, 14);
            }
          },
        }));
      }

      // ---------------- painting ----------------

      function paint(feature, lyr) {
        if (brush === null) return;
        const props = feature.properties;
        const key = props.search_key;
        if (zoneOf(props) === brush) return;

        const hadOverride = Object.prototype.hasOwnProperty.call(overrides, key);
        undoStack.push({ key: key, previous: hadOverride ? overrides[key] : null });

        if (brush === baseZone(props)) {
          delete overrides[key];
        } else {
          overrides[key] = brush;
        }
        saveOverrides();
        layer.resetStyle(lyr);
        refreshPanel();
      }

      function undo() {
        const entry = undoStack.pop();
        if (!entry) return;
        if (entry.previous === null) {
          delete overrides[entry.key];
        } else {
          overrides[entry.key] = entry.previous;
        }
        saveOverrides();
        restyleAll();
        refreshPanel();
      }

      function resetAll() {
        if (Object.keys(overrides).length === 0) return;
        if (!window.confirm('Discard every manual zone change?')) return;
        overrides = {};
        undoStack.length = 0;
        saveOverrides();
        restyleAll();
        refreshPanel();
      }

      function cancelBrush() {
        brush = null;
        refreshPanel();
      }

      function restyleAll() {
        layer.eachLayer(function (lyr) { layer.resetStyle(lyr); });
      }

      // ---------------- export ----------------

      function csvCell(value) {
        const text = String(value == null ? '' : value);
        return /[",\r\n]/.test(text) ? '"' + text.replace(/"/g, '""') + '"' : text;
      }

      function exportCsv() {
        const lines = [['suburb', 'postcode', 'zone', 'fee', 'color'].join(',')];
        DATA.features.forEach(function (feature) {
          const props = feature.properties;
          const zone = ZONES[zoneOf(props)];
          lines.push([props.suburb, props.postcode, zone.label, zone.fee, zone.color].map(csvCell).join(','));
        });

        const blob = new Blob(['\ufeff' + lines.join('\r\n') + '\r\n'], { type: 'text/csv;charset=utf-8' });
        const url = URL.createObjectURL(blob);
        const link = document.createElement('a');
        link.href = url;
        link.download = CONFIG.exportFilename;
        document.body.appendChild(link);
        link.click();
        document.body.removeChild(link);
        setTimeout(function () { URL.revokeObjectURL(url); }, 0);
      }

      // ---------------- controls ----------------

      const legend = L.control({ position: 'bottomright' });
      legend.onAdd = function () {
        const div = L.DomUtil.create('div', 'zone-panel');
        div.innerHTML = '<h4>Delivery fee</h4>' + ZONES.map(function (zone) {
          return '<div class="zone-row"><span class="zone-swatch" style="background:' + escapeHtml(zone.color) +
            '"></span><span>' + escapeHtml(zone.label) + ' &middot; ' + escapeHtml(zone.fee) + '</span></div>';
        }).join('') + '<div class="zone-footer">Generated ' + escapeHtml(CONFIG.generatedAt) + '</div>';
        return div;
      };
      legend.addTo(map);

      let brushButtons = [];
      let undoButton = null;
      let resetButton = null;
      let status = null;

      const palette = L.control({ position: 'topright' });
      palette.onAdd = function () {
        const div = L.DomUtil.create('div', 'zone-panel');
        L.DomEvent.disableClickPropagation(div);
        L.DomEvent.disableScrollPropagation(div);

        const heading = L.DomUtil.create('h4', '', div);
        heading.textContent = 'Recolor areas';

        brushButtons = ZONES.map(function (zone, index) {
          const button = L.DomUtil.create('button', 'zone-brush', div);
          button.type = 'button';
          button.innerHTML = '<span class="zone-swatch" style="background:' + escapeHtml(zone.color) +
            '"></span><span>' + escapeHtml(zone.label) + '</span>';
          button.addEventListener('click', function () {
            brush = brush === index ? null : index;
            refreshPanel();
          });
          return button;
        });

        const actions = L.DomUtil.create('div', 'zone-actions', div);
        function action(label, handler) {
          const button = L.DomUtil.create('button', '', actions);
          button.type = 'button';
          button.textContent = label;
          button.addEventListener('click', handler);
          return button;
        }
        action('Cancel', cancelBrush);
        undoButton = action('Undo', undo);
        resetButton = action('Reset', resetAll);
        action('Export CSV', exportCsv);

        status = L.DomUtil.create('div', 'zone-status', div);
        refreshPanel();
        return div;
      };
      palette.addTo(map);

      function refreshPanel() {
        brushButtons.forEach(function (button, index) {
          button.classList.toggle('active', brush === index);
        });
        if (undoButton) undoButton.disabled = undoStack.length === 0;
        if (resetButton) resetButton.disabled = Object.keys(overrides).length === 0;
        if (status) {
          const changed = Object.keys(overrides).length;
          status.textContent = (brush === null ? 'No brush selected' : 'Painting: ' + ZONES[brush].label) +
            ' · ' + changed + ' changed';
        }
      }
    })();
  </script>
</body>

</html>
"#;
