//! Composite indicators derived from raw counts.
//!
//! The weights and operands below are the ones the model was trained with.
//! Changing any of them shifts the model's input distribution.

use super::FeatureRecord;

/// Weights of the final risk blend, `(metric, weight)`.
pub const FINAL_RISK_WEIGHTS: [(&str, f64); 9] = [
    ("score_riesgo", 0.3),
    ("riesgo_comportamental", 0.2),
    ("vulnerabilidad_financiera", 0.15),
    ("informalidad_total", 0.1),
    ("presion_financiera", 0.15),
    ("vulnerabilidad_contextual", 0.1),
    ("score_confiabilidad", -0.25),
    ("modernizacion_financiera", -0.15),
    ("nivel_socioeconomico", -0.1),
];

/// Computes derived metrics from a raw variable record.
#[derive(Debug, Clone, Copy, Default)]
pub struct DerivedMetrics;

fn flag(value: f64) -> f64 {
    if value > 0.0 {
        1.0
    } else {
        0.0
    }
}

impl DerivedMetrics {
    pub fn new() -> Self {
        Self
    }

    /// Compute every derived metric.
    ///
    /// Metrics that depend on other derived metrics are computed after
    /// their inputs, in a single pass. Missing raw counts read as zero.
    pub fn compute(&self, raw: &FeatureRecord) -> FeatureRecord {
        let v = |name: &str| raw.value(name);
        let mut d = FeatureRecord::new();

        d.insert(
            "ratio_ingresos_gastos",
            v("ingresos_count") / (v("gastos_count") + 1.0),
        );
        d.insert(
            "ratio_aprobaciones_rechazos",
            v("aprobaciones_count") / (v("rechazos_count") + 1.0),
        );
        d.insert("tiene_nomina", flag(v("nomina_count")));
        d.insert("tiene_servicios_publicos", flag(v("servicios_publicos_count")));
        d.insert("tiene_salud", flag(v("salud_seguros_count")));
        d.insert(
            "alertas_riesgo",
            v("saldo_bajo_count") + v("mora_count") + v("cobranza_count") + v("rechazos_count"),
        );

        let nivel_transaccional = v("ingresos_count") + v("gastos_count") + v("montos_count");
        d.insert("nivel_transaccional", nivel_transaccional);

        let diversificacion_financiera = flag(v("nequi_count"))
            + flag(v("bancolombia_count"))
            + flag(v("davivienda_count"))
            + flag(v("otros_bancos_count"))
            + flag(v("billeteras_count"));
        d.insert("diversificacion_financiera", diversificacion_financiera);

        d.insert(
            "engagement_score",
            v("otp_count") * 2.0 + nivel_transaccional + diversificacion_financiera * 3.0,
        );

        let estabilidad_laboral =
            v("nomina_count") + v("pensiones_cesantias_count") + v("cooperativas_count");
        d.insert("estabilidad_laboral", estabilidad_laboral);

        let obligaciones_fijas = v("arriendos_count")
            + v("servicios_publicos_count")
            + v("medicina_prepagada_count")
            + v("gimnasios_count");
        d.insert("obligaciones_fijas", obligaciones_fijas);

        let estres_financiero = v("casas_empeno_count")
            + v("saldo_bajo_count")
            + v("mora_count")
            + v("cobranza_count")
            + v("rechazos_count");
        d.insert("estres_financiero", estres_financiero);

        let buen_comportamiento_pago =
            v("pago_puntual_count") + v("fidelizacion_count") + v("aprobaciones_count");
        d.insert("buen_comportamiento_pago", buen_comportamiento_pago);

        let credito_formal =
            v("tarjetas_credito_count") + v("microcreditos_count") + v("credito_grande_count");
        d.insert("credito_formal", credito_formal);
        d.insert(
            "ratio_credito_formal_informal",
            credito_formal / (v("casas_empeno_count") + 1.0),
        );

        d.insert(
            "gastos_discrecionales",
            v("viajes_count") + v("restaurantes_count") + v("gimnasios_count") + v("ecommerce_count"),
        );
        d.insert(
            "prevision_financiera",
            v("seguros_varios_count")
                + v("ahorro_inversion_count")
                + v("pensiones_cesantias_count")
                + v("inversiones_count"),
        );
        d.insert(
            "cumplimiento_tributario",
            v("impuesto_count") + v("impuestos_obligaciones_count"),
        );
        d.insert(
            "inclusion_financiera",
            diversificacion_financiera
                + flag(v("subsidios_count"))
                + flag(v("cooperativas_count"))
                + flag(v("ahorro_inversion_count")),
        );
        d.insert(
            "ratio_obligaciones_ingresos",
            obligaciones_fijas / (v("ingresos_count") + v("nomina_count") + 1.0),
        );

        d.insert(
            "score_riesgo",
            estres_financiero * 2.0 - buen_comportamiento_pago * 3.0 - estabilidad_laboral * 2.0
                + v("casas_empeno_count") * 5.0,
        );
        d.insert(
            "estabilidad_emocional",
            v("mensajes_positivos_count")
                - v("groserias_count")
                - v("alcohol_count")
                - v("apuestas_count"),
        );
        d.insert(
            "riesgo_comportamental",
            v("groserias_count")
                + v("apuestas_count")
                + v("alcohol_count")
                + v("horarios_sospechosos_count")
                + v("prestamos_conocidos_count"),
        );
        d.insert(
            "nivel_socioeconomico",
            v("zona_premium_count")
                + v("educacion_privada_count")
                + v("marcas_lujo_count")
                + v("deportes_premium_count")
                + v("transporte_particular_count")
                - v("economia_informal_count")
                - v("subsidios_count"),
        );
        d.insert(
            "presion_financiera",
            v("prestamos_conocidos_count")
                + v("emergencia_medica_count")
                + v("busqueda_empleo_count")
                + v("economia_informal_count")
                + v("cancelaciones_count"),
        );
        d.insert(
            "formalidad_financiera",
            v("pospago_vs_prepago")
                + flag(v("transporte_particular_count"))
                + flag(v("educacion_privada_count"))
                - v("efectivo_count")
                - v("economia_informal_count"),
        );
        d.insert(
            "score_confiabilidad",
            v("mensajes_positivos_count") + v("pago_puntual_count") + v("fidelizacion_count")
                - v("groserias_count")
                - v("cancelaciones_count")
                - v("horarios_sospechosos_count"),
        );
        d.insert(
            "vulnerabilidad_financiera",
            v("prestamos_conocidos_count")
                + v("casas_empeno_count")
                + v("emergencia_medica_count")
                + v("busqueda_empleo_count")
                + v("economia_informal_count")
                + v("ventas_catalogo_count"),
        );
        d.insert(
            "informalidad_total",
            v("economia_informal_count")
                + v("informalidad_laboral_count")
                + v("efectivo_count")
                + v("negociacion_regateo_count")
                + v("ventas_catalogo_count"),
        );
        d.insert(
            "vulnerabilidad_contextual",
            v("violencia_inseguridad_count")
                + v("problemas_climaticos_count")
                + v("actividades_comunitarias_count")
                + v("comercios_populares_count"),
        );
        d.insert(
            "modernizacion_financiera",
            v("productos_financieros_col_count")
                + v("internet_conectividad_count")
                + v("otp_count")
                + v("billeteras_count")
                - v("efectivo_count"),
        );

        let score_riesgo_final = FINAL_RISK_WEIGHTS
            .iter()
            .map(|&(name, weight)| d.value(name) * weight)
            .sum::<f64>();
        d.insert("score_riesgo_final", score_riesgo_final);

        d
    }
}
