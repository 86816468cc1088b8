//! Keyword signal table.
//!
//! Each entry maps a count variable to a case-insensitive pattern searched
//! anywhere in the message body. The table is calibration data for the
//! trained model: names, patterns and order are fixed.

use once_cell::sync::Lazy;
use regex::Regex;

/// Body signals, `(variable, pattern)`.
pub const BODY_SIGNALS: &[(&str, &str)] = &[
    ("nequi_count", "nequi"),
    ("bancolombia_count", "bancolombia"),
    ("davivienda_count", "davivienda"),
    ("cotizante_count", "cotizante"),
    ("impuesto_count", "dian|impuesto"),
    ("prepago_count", "recarga|prepago"),
    ("nomina_count", "nomina|proveedor|salario"),
    ("educacion_count", "escolar|matricula|universidad|colegio"),
    ("servicios_publicos_count", "epm|codensa|gas natural|acueducto"),
    ("salud_seguros_count", "eps|sura|sanitas|compensar"),
    ("ingresos_count", "consignacion|deposito|transferencia recibida"),
    ("gastos_count", "compra|retiro|pago realizado|debito"),
    ("saldo_bajo_count", "saldo insuficiente|sin saldo"),
    ("cobranza_count", "cobranza|cobro|juridico|multa"),
    ("mora_count", "vencido|mora|atrasado|pendiente"),
    ("aprobaciones_count", "preaprobado|aprobado|cupo disponible"),
    ("rechazos_count", "rechazado|negado|no aprobado"),
    (
        "montos_count",
        r"\$[\d.,]+|\b\d{1,3}(?:\.\d{3})*(?:,\d{2})?\s*(?:pesos|cop)",
    ),
    ("otp_count", r"\b(?:codigo|clave|otp|token)\b"),
    ("transporte_count", "transmilenio|sitp|taxi|beat|uber"),
    ("inversiones_count", "cdt|inversion|rentabilidad"),
    ("credito_grande_count", "hipoteca|credito vehiculo|leasing"),
    ("pensiones_cesantias_count", "colpensiones|porvenir|proteccion"),
    ("arriendos_count", "arriendo|arrendamiento|canon"),
    ("cooperativas_count", "cooperativa|coomeva|copetran"),
    ("casas_empeno_count", "prenda|empeño|gota a gota"),
    ("corresponsales_count", "baloto|via baloto|corresponsal"),
    ("subsidios_count", "familias en accion|jovenes en accion|subsidio"),
    ("tarjetas_credito_count", "visa|mastercard|american express"),
    ("ahorro_inversion_count", "ahorro programado|cdt virtual"),
    ("pago_puntual_count", "pago exitoso|pago confirmado"),
    ("fidelizacion_count", "felicitaciones|premio|beneficio"),
    ("microcreditos_count", "microcredito|credito de consumo"),
    ("compras_credito_count", "cuotas sin interes|financiacion"),
    ("mensajeria_count", "domicilio|mensajeria|envio"),
    ("gasolina_peajes_count", "gasolina|estacion de servicio|peaje"),
    ("medicina_prepagada_count", "colsanitas|medisanitas|colmedica"),
    ("gimnasios_count", "gimnasio|bodytech|smartfit"),
    ("viajes_count", "avianca|latam|viva air|despegar"),
    ("seguros_varios_count", "seguro de vida|soat|seguro todo riesgo"),
    ("impuestos_obligaciones_count", "predial|vehiculo|renta|retencion"),
    ("restaurantes_count", "restaurante|cine|teatro"),
    ("groserias_count", "hp|hijueputa|malparido"),
    ("apuestas_count", "apuesta|betplay|wplay"),
    ("alcohol_count", "cerveza|aguardiente|ron"),
    ("comida_rapida_count", "dominos|papa johns|burger king"),
    ("emergencia_medica_count", "emergencia|urgencia medica"),
    ("economia_informal_count", "rebusque|camello|chambita"),
    ("efectivo_count", "efectivo|cash|plata en mano"),
    ("ventas_catalogo_count", "yanbal|avon|natura"),
    ("familia_count", "hijo|hija|bebe|esposa"),
    ("deportes_premium_count", "golf|tenis|equitacion"),
    ("transporte_particular_count", "carro propio|vehiculo particular"),
    ("educacion_privada_count", "colegio privado|universidad privada"),
    ("zona_premium_count", "chicó|rosales|virrey"),
    ("marcas_lujo_count", "apple|iphone|samsung galaxy"),
    ("prestamos_conocidos_count", "prestame|me prestas|favor presta"),
    ("busqueda_empleo_count", "vacante|empleo|trabajo"),
    ("cancelaciones_count", "cancelar pedido|devolucion"),
    ("mensajes_positivos_count", "gracias|agradezco|excelente servicio"),
    (
        "horarios_sospechosos_count",
        r"\b(0[1-4]:[0-5]\d\s*am|madrugada)\b",
    ),
    ("ciudades_principales_count", "bogota|medellin|cali"),
    ("productos_financieros_col_count", "ahorro a la mano|cuenta amiga"),
    ("comercios_populares_count", "tiendas d1|justo y bueno|ara"),
    ("informalidad_laboral_count", "vendedor ambulante|reciclador"),
    ("negociacion_regateo_count", "rebaja|descuento|negociar"),
    ("problemas_climaticos_count", "inundacion|derrumbe"),
    ("actividades_agro_count", "cosecha|siembra|ganado"),
    ("internet_conectividad_count", "wifi|internet|datos moviles"),
    ("violencia_inseguridad_count", "robo|atraco|inseguridad"),
    ("actividades_comunitarias_count", "junta de accion|reunion vecinos"),
    ("otros_bancos_count", "bbva|colpatria|caja social"),
    ("billeteras_count", "daviplata|movii|dale"),
    ("ecommerce_count", "mercadolibre|amazon|netflix"),
    ("retail_count", "exito|carulla|jumbo|d1"),
    ("fintech_count", "dineroya|rapicredit"),
    ("telco_count", "claro|movistar|tigo"),
    ("geeks_count", "uber|rappi|cabify"),
];

/// Plan-type patterns combined into `pospago_vs_prepago`. Scanned
/// independently, so one message may count toward both.
pub const POSPAGO_PATTERN: &str = "pospago";
pub const PREPAGO_PATTERN: &str = "prepago";

/// Sender pattern for WhatsApp-relayed messages.
pub const WHATSAPP_PATTERN: &str = "whatsapp|wa.me";

/// Senders with at least this many digits are counted as phishing candidates.
pub const PHISHING_MIN_DIGITS: usize = 10;

/// A compiled signal.
#[derive(Debug)]
pub struct Signal {
    pub name: &'static str,
    pub regex: Regex,
}

impl Signal {
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

/// Compile a table pattern with case-insensitive matching.
pub fn compile(pattern: &str) -> Regex {
    Regex::new(&format!("(?i){pattern}")).expect("invalid signal pattern")
}

/// All body signals, compiled once per process.
pub static COMPILED_BODY_SIGNALS: Lazy<Vec<Signal>> = Lazy::new(|| {
    BODY_SIGNALS
        .iter()
        .map(|&(name, pattern)| Signal {
            name,
            regex: compile(pattern),
        })
        .collect()
});

pub static POSPAGO_REGEX: Lazy<Regex> = Lazy::new(|| compile(POSPAGO_PATTERN));
pub static PREPAGO_REGEX: Lazy<Regex> = Lazy::new(|| compile(PREPAGO_PATTERN));
pub static WHATSAPP_REGEX: Lazy<Regex> = Lazy::new(|| compile(WHATSAPP_PATTERN));
pub static DIGIT_REGEX: Lazy<Regex> = Lazy::new(|| compile(r"\d"));

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn signal(name: &str) -> &'static Signal {
        COMPILED_BODY_SIGNALS
            .iter()
            .find(|s| s.name == name)
            .unwrap()
    }

    #[test]
    fn test_all_patterns_compile() {
        assert_eq!(COMPILED_BODY_SIGNALS.len(), BODY_SIGNALS.len());
    }

    /// One body per signal, in table order, that the signal must match.
    const SAMPLES: &[(&str, &str)] = &[
        ("nequi_count", "Transferencia Nequi"),
        ("bancolombia_count", "Bancolombia le informa"),
        ("davivienda_count", "Davivienda: movimiento"),
        ("cotizante_count", "Usted es cotizante activo"),
        ("impuesto_count", "Declaracion DIAN"),
        ("prepago_count", "Recarga exitosa"),
        ("nomina_count", "Pago de nomina"),
        ("educacion_count", "Pago de matricula"),
        ("servicios_publicos_count", "Factura EPM"),
        ("salud_seguros_count", "Cita en tu EPS"),
        ("ingresos_count", "Consignacion recibida"),
        ("gastos_count", "Compra en tienda"),
        ("saldo_bajo_count", "Saldo insuficiente"),
        ("cobranza_count", "Proceso juridico"),
        ("mora_count", "Obligacion en mora"),
        ("aprobaciones_count", "Credito preaprobado"),
        ("rechazos_count", "Solicitud rechazada: no aprobado"),
        ("montos_count", "Compra por $50.000"),
        ("otp_count", "Tu codigo es 1234"),
        ("transporte_count", "Tu taxi llego"),
        ("inversiones_count", "Tu CDT vence"),
        ("credito_grande_count", "Cuota de hipoteca"),
        ("pensiones_cesantias_count", "Colpensiones informa"),
        ("arriendos_count", "Pago de arriendo"),
        ("cooperativas_count", "Coomeva te saluda"),
        ("casas_empeno_count", "Prestamos gota a gota"),
        ("corresponsales_count", "Paga en Baloto"),
        ("subsidios_count", "Subsidio de vivienda"),
        ("tarjetas_credito_count", "Tu Mastercard"),
        ("ahorro_inversion_count", "Ahorro programado activo"),
        ("pago_puntual_count", "Pago confirmado"),
        ("fidelizacion_count", "Ganaste un premio"),
        ("microcreditos_count", "Microcredito desembolsado"),
        ("compras_credito_count", "Financiacion disponible"),
        ("mensajeria_count", "Tu domicilio va en camino"),
        ("gasolina_peajes_count", "Peaje cobrado"),
        ("medicina_prepagada_count", "Colmedica informa"),
        ("gimnasios_count", "Bienvenido a Smartfit"),
        ("viajes_count", "Vuelo Avianca"),
        ("seguros_varios_count", "Renueva tu SOAT"),
        ("impuestos_obligaciones_count", "Impuesto predial"),
        ("restaurantes_count", "Boletas de cine"),
        ("groserias_count", "malparido"),
        ("apuestas_count", "Juega en Wplay"),
        ("alcohol_count", "Aguardiente en promo"),
        ("comida_rapida_count", "Combo Burger King"),
        ("emergencia_medica_count", "Urgencia medica"),
        ("economia_informal_count", "Salio un camello"),
        ("efectivo_count", "Retira en efectivo"),
        ("ventas_catalogo_count", "Catalogo Yanbal"),
        ("familia_count", "Tu hija llego"),
        ("deportes_premium_count", "Clases de golf"),
        ("transporte_particular_count", "Carro propio"),
        ("educacion_privada_count", "Colegio privado"),
        ("zona_premium_count", "Entrega en Rosales"),
        ("marcas_lujo_count", "Nuevo iPhone"),
        ("prestamos_conocidos_count", "Me prestas 20"),
        ("busqueda_empleo_count", "Nueva vacante"),
        ("cancelaciones_count", "Devolucion procesada"),
        ("mensajes_positivos_count", "Gracias por tu compra"),
        ("horarios_sospechosos_count", "Retiro a las 02:30 am"),
        ("ciudades_principales_count", "Envio a Medellin"),
        ("productos_financieros_col_count", "Abre tu cuenta amiga"),
        ("comercios_populares_count", "Oferta en Tiendas D1"),
        ("informalidad_laboral_count", "Soy reciclador"),
        ("negociacion_regateo_count", "Descuento especial"),
        ("problemas_climaticos_count", "Alerta de derrumbe"),
        ("actividades_agro_count", "Tiempo de cosecha"),
        ("internet_conectividad_count", "Sin wifi"),
        ("violencia_inseguridad_count", "Reporte de atraco"),
        ("actividades_comunitarias_count", "Junta de accion comunal"),
        ("otros_bancos_count", "BBVA te informa"),
        ("billeteras_count", "Daviplata: recibiste"),
        ("ecommerce_count", "Tu plan Netflix"),
        ("retail_count", "Compra en Carulla"),
        ("fintech_count", "Rapicredit desembolso"),
        ("telco_count", "Claro te informa"),
        ("geeks_count", "Tu pedido Rappi"),
    ];

    #[test]
    fn test_table_size() {
        assert_eq!(BODY_SIGNALS.len(), 78);
    }

    #[test]
    fn test_every_signal_matches_its_sample() {
        let sample_names: Vec<&str> = SAMPLES.iter().map(|(name, _)| *name).collect();
        let table_names: Vec<&str> = BODY_SIGNALS.iter().map(|(name, _)| *name).collect();
        assert_eq!(sample_names, table_names);

        for (signal, (name, body)) in COMPILED_BODY_SIGNALS.iter().zip(SAMPLES) {
            assert!(signal.is_match(body), "{name} did not match {body:?}");
        }
    }

    #[test]
    fn test_neutral_body_matches_nothing() {
        let matched: Vec<&str> = COMPILED_BODY_SIGNALS
            .iter()
            .filter(|s| s.is_match("zzz"))
            .map(|s| s.name)
            .collect();
        assert!(matched.is_empty(), "unexpected matches: {matched:?}");
    }

    #[test]
    fn test_signal_names_unique_and_suffixed() {
        let names: HashSet<&str> = BODY_SIGNALS.iter().map(|(name, _)| *name).collect();
        assert_eq!(names.len(), BODY_SIGNALS.len());
        assert!(BODY_SIGNALS.iter().all(|(name, _)| name.ends_with("_count")));
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        assert!(signal("nequi_count").is_match("Transferencia NEQUI exitosa"));
        assert!(signal("zona_premium_count").is_match("Entrega en el CHICÓ"));
        assert!(signal("casas_empeno_count").is_match("Su EMPEÑO vence hoy"));
    }

    #[test]
    fn test_montos_pattern() {
        let montos = signal("montos_count");
        assert!(montos.is_match("Compra por $150.000 aprobada"));
        assert!(montos.is_match("Recibiste 20.000 pesos"));
        assert!(montos.is_match("abono de 1.250.000,50 COP"));
        assert!(!montos.is_match("Sin movimientos"));
    }

    #[test]
    fn test_otp_requires_whole_word() {
        let otp = signal("otp_count");
        assert!(otp.is_match("Tu codigo es 1234"));
        assert!(otp.is_match("Clave temporal"));
        assert!(!otp.is_match("codigos promocionales"));
        assert!(!otp.is_match("tokenizado"));
    }

    #[test]
    fn test_suspicious_hours() {
        let horarios = signal("horarios_sospechosos_count");
        assert!(horarios.is_match("Retiro a las 03:15 am"));
        assert!(horarios.is_match("Compra en la madrugada"));
        assert!(!horarios.is_match("Retiro a las 05:15 am"));
    }

    #[test]
    fn test_short_keywords_match_as_substrings() {
        // Short keywords are plain substrings, not words.
        assert!(signal("alcohol_count").is_match("Tu pago de matrONa"));
        assert!(signal("groserias_count").is_match("Curso de PHP gratis"));
    }

    #[test]
    fn test_whatsapp_dot_is_wildcard() {
        assert!(WHATSAPP_REGEX.is_match("https://wa.me/57300"));
        assert!(WHATSAPP_REGEX.is_match("WAxME"));
        assert!(WHATSAPP_REGEX.is_match("WhatsApp Business"));
    }
}
